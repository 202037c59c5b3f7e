//! In-memory registry, for tests and ephemeral runs.

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{DeviceRecord, DeviceRegistry};

#[derive(Debug, Default)]
pub struct MemoryRegistry {
    records: Mutex<Vec<DeviceRecord>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<DeviceRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }
}

#[async_trait]
impl DeviceRegistry for MemoryRegistry {
    async fn devices(&self) -> anyhow::Result<Vec<DeviceRecord>> {
        Ok(self.records.lock().await.clone())
    }

    async fn register(&self, record: DeviceRecord) -> anyhow::Result<()> {
        let mut records = self.records.lock().await;
        records.retain(|r| r.name != record.name);
        records.push(record);
        Ok(())
    }

    async fn remove(&self, name: &str) -> anyhow::Result<()> {
        self.records.lock().await.retain(|r| r.name != name);
        Ok(())
    }
}
