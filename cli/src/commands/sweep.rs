use std::time::Instant;

use anyhow::Context;
use tracing::info;

use whoshome_common::config::ProbeConfig;
use whoshome_common::network::subnet::Subnet;
use whoshome_core::sweep::{PingSweeper, Sweeper};

/// Probe every host of one subnet once, then exit. Useful for warming the
/// neighbor cache by hand or checking probe permissions.
pub async fn sweep(cidr: &str, config: ProbeConfig) -> anyhow::Result<()> {
    let subnet: Subnet = cidr.parse().context("invalid sweep target")?;
    let sweeper = PingSweeper::new(&config);

    let started = Instant::now();
    sweeper.sweep(&subnet).await?;

    info!(
        "swept {subnet} in {:.2}s",
        started.elapsed().as_secs_f64()
    );
    Ok(())
}
