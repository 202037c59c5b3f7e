use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use whoshome_common::config::ProbeConfig;
use whoshome_core::registry::FileRegistry;
use whoshome_core::routes::SystemRouteTable;
use whoshome_core::scheduler::UpdateScheduler;
use whoshome_core::status::UpdateStatus;
use whoshome_core::sweep::PingSweeper;

/// Start the presence updater and keep it running until ctrl-c.
pub async fn run(registry_path: PathBuf, config: ProbeConfig) -> anyhow::Result<()> {
    let registry = Arc::new(FileRegistry::new(registry_path));
    let status = Arc::new(UpdateStatus::new());

    let scheduler = UpdateScheduler::new(
        registry,
        Arc::new(SystemRouteTable),
        Arc::new(PingSweeper::new(&config)),
        Arc::clone(&status),
        config.update_interval,
    );

    let (stop_tx, stop_rx) = watch::channel(false);
    let handle = tokio::spawn(scheduler.run(stop_rx));

    tokio::signal::ctrl_c().await?;
    info!("shutting down (last update: {})", status.describe());

    stop_tx.send(true)?;
    handle.await?;
    Ok(())
}
