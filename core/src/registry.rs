//! Registered device storage.
//!
//! The engine consumes records read-only: the recorded network field decides
//! which subnets get swept. Registration and removal belong to the front
//! end. Every store serializes its own access, so interleaved registrations
//! from concurrent callers cannot lose each other's writes.

use async_trait::async_trait;

use whoshome_common::network::mac::LinkLayerId;
use whoshome_common::network::subnet::Subnet;

pub mod file;
pub mod memory;

pub use file::FileRegistry;
pub use memory::MemoryRegistry;

/// A device someone asked us to watch for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    pub name: String,
    pub lladdr: LinkLayerId,
    /// The subnet the device was registered on; sweeps target this, after
    /// checking it still resolves to a live local route.
    pub network: Subnet,
}

#[async_trait]
pub trait DeviceRegistry: Send + Sync {
    async fn devices(&self) -> anyhow::Result<Vec<DeviceRecord>>;

    /// Registering an already-known name replaces the old record.
    async fn register(&self, record: DeviceRecord) -> anyhow::Result<()>;

    /// Removing an unknown name is a no-op.
    async fn remove(&self, name: &str) -> anyhow::Result<()>;
}
