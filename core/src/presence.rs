//! Read side: who is on the network right now.

use std::collections::BTreeSet;
use std::sync::Arc;

use whoshome_common::error::ProbeInfraError;
use whoshome_common::network::mac::LinkLayerId;

use crate::neighbor;
use crate::status::UpdateStatus;

/// Presence view over the neighbor cache.
///
/// Pure read: nothing here triggers probing. Freshness depends entirely on
/// the last completed scheduler cycle, which [`Self::last_update_description`]
/// reports.
pub struct PresenceView {
    status: Arc<UpdateStatus>,
}

impl PresenceView {
    pub fn new(status: Arc<UpdateStatus>) -> Self {
        Self { status }
    }

    /// Link-layer ids currently present: REACHABLE or STALE neighbor
    /// entries, uppercase-normalized and deduplicated.
    pub async fn currently_present(&self) -> Result<BTreeSet<LinkLayerId>, ProbeInfraError> {
        let entries = neighbor::read_neighbor_cache().await?;
        Ok(neighbor::present_ids(&entries))
    }

    /// "never" until a cycle completes, then the elapsed time since the
    /// last cycle began.
    pub fn last_update_description(&self) -> String {
        self.status.describe()
    }
}
