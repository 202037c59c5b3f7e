//! Freshness bookkeeping shared between the scheduler and readers.

use std::sync::RwLock;

use tokio::time::Instant;

/// When the last completed sweep cycle *started*.
///
/// Written only by the scheduler task, read by any number of concurrent
/// tasks. The lock around the single value rules out torn reads.
#[derive(Debug, Default)]
pub struct UpdateStatus {
    last_cycle_start: RwLock<Option<Instant>>,
}

impl UpdateStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed cycle. `started` is the cycle's start instant:
    /// freshness is measured from when probing began, not when it ended.
    pub fn mark_cycle(&self, started: Instant) {
        *self.last_cycle_start.write().unwrap() = Some(started);
    }

    pub fn last_cycle_start(&self) -> Option<Instant> {
        *self.last_cycle_start.read().unwrap()
    }

    /// Human-readable elapsed time since the last completed cycle, or the
    /// "never" sentinel before the first one finishes.
    pub fn describe(&self) -> String {
        match self.last_cycle_start() {
            None => "never".to_string(),
            Some(started) => {
                let secs = started.elapsed().as_secs();
                format!("{} minutes {} seconds", secs / 60, secs % 60)
            }
        }
    }
}
