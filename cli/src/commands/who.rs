use std::path::PathBuf;
use std::sync::Arc;

use whoshome_core::presence::PresenceView;
use whoshome_core::registry::{DeviceRegistry, FileRegistry};
use whoshome_core::status::UpdateStatus;

use crate::terminal::print;

/// One-shot presence listing: the neighbor cache cross-referenced against
/// the registry. Accuracy depends on a `run` daemon keeping the cache warm.
pub async fn who(registry_path: PathBuf) -> anyhow::Result<()> {
    let registry = FileRegistry::new(registry_path);
    let view = PresenceView::new(Arc::new(UpdateStatus::new()));

    let present = view.currently_present().await?;
    let devices = registry.devices().await?;

    print::header("who's home");

    if devices.is_empty() {
        print::note("no registered devices");
    }
    for device in &devices {
        print::device_line(
            &device.name,
            &device.lladdr.to_string(),
            present.contains(&device.lladdr),
        );
    }

    let unknown = present
        .iter()
        .filter(|id| !devices.iter().any(|d| d.lladdr == **id))
        .count();
    if unknown > 0 {
        print::note(&format!("{unknown} unregistered devices also present"));
    }

    Ok(())
}
