//! JSON-file registry.
//!
//! All reads and writes funnel through one async mutex, so concurrent
//! registrations cannot clobber each other's read-modify-write. Records are
//! stored as plain strings to keep the file hand-editable.

use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::{DeviceRecord, DeviceRegistry};

#[derive(Debug, Serialize, Deserialize)]
struct StoredDevice {
    name: String,
    lladdr: String,
    network: String,
}

impl From<&DeviceRecord> for StoredDevice {
    fn from(record: &DeviceRecord) -> Self {
        Self {
            name: record.name.clone(),
            lladdr: record.lladdr.to_string(),
            network: record.network.to_string(),
        }
    }
}

impl StoredDevice {
    fn into_record(self) -> anyhow::Result<DeviceRecord> {
        Ok(DeviceRecord {
            lladdr: self
                .lladdr
                .parse()
                .with_context(|| format!("device '{}'", self.name))?,
            network: self
                .network
                .parse()
                .with_context(|| format!("device '{}'", self.name))?,
            name: self.name,
        })
    }
}

pub struct FileRegistry {
    path: PathBuf,
    io_lock: Mutex<()>,
}

impl FileRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            io_lock: Mutex::new(()),
        }
    }

    /// A registry file that does not exist yet is an empty registry.
    async fn load(&self) -> anyhow::Result<Vec<DeviceRecord>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e).context("reading device registry"),
        };

        let stored: Vec<StoredDevice> =
            serde_json::from_str(&raw).context("parsing device registry")?;
        stored.into_iter().map(StoredDevice::into_record).collect()
    }

    async fn store(&self, records: &[DeviceRecord]) -> anyhow::Result<()> {
        let stored: Vec<StoredDevice> = records.iter().map(StoredDevice::from).collect();
        let raw = serde_json::to_string_pretty(&stored)?;
        tokio::fs::write(&self.path, raw)
            .await
            .context("writing device registry")
    }
}

#[async_trait]
impl DeviceRegistry for FileRegistry {
    async fn devices(&self) -> anyhow::Result<Vec<DeviceRecord>> {
        let _guard = self.io_lock.lock().await;
        self.load().await
    }

    async fn register(&self, record: DeviceRecord) -> anyhow::Result<()> {
        let _guard = self.io_lock.lock().await;
        let mut records = self.load().await?;
        records.retain(|r| r.name != record.name);
        records.push(record);
        self.store(&records).await
    }

    async fn remove(&self, name: &str) -> anyhow::Result<()> {
        let _guard = self.io_lock.lock().await;
        let mut records = self.load().await?;
        records.retain(|r| r.name != name);
        self.store(&records).await
    }
}
