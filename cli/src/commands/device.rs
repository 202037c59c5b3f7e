use std::path::PathBuf;

use anyhow::Context;
use tracing::info;

use whoshome_core::registry::{DeviceRecord, DeviceRegistry, FileRegistry};

pub async fn add(
    registry_path: PathBuf,
    name: String,
    lladdr: &str,
    network: &str,
) -> anyhow::Result<()> {
    let record = DeviceRecord {
        lladdr: lladdr.parse().context("invalid link-layer address")?,
        network: network.parse().context("invalid network")?,
        name,
    };

    let registry = FileRegistry::new(registry_path);
    registry.register(record).await?;
    info!("device registered");
    Ok(())
}

pub async fn remove(registry_path: PathBuf, name: &str) -> anyhow::Result<()> {
    let registry = FileRegistry::new(registry_path);
    registry.remove(name).await?;
    info!("device removed");
    Ok(())
}
