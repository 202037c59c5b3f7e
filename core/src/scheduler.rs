//! The update loop.
//!
//! One background task alternates between sweeping and sleeping for the life
//! of the process. Scheduling is fixed-rate: the sleep is shortened by
//! however long the sweep took, so cycle starts stay evenly spaced instead
//! of drifting by one sweep duration per cycle. A cycle that overruns the
//! interval rolls straight into the next one.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, Instant};
use tracing::{debug, error, info, warn};

use whoshome_common::network::subnet::Subnet;

use crate::registry::DeviceRegistry;
use crate::routes::SubnetResolver;
use crate::status::UpdateStatus;
use crate::sweep::Sweeper;

pub struct UpdateScheduler {
    registry: Arc<dyn DeviceRegistry>,
    resolver: Arc<dyn SubnetResolver>,
    sweeper: Arc<dyn Sweeper>,
    status: Arc<UpdateStatus>,
    interval: Duration,
}

impl UpdateScheduler {
    pub fn new(
        registry: Arc<dyn DeviceRegistry>,
        resolver: Arc<dyn SubnetResolver>,
        sweeper: Arc<dyn Sweeper>,
        status: Arc<UpdateStatus>,
        interval: Duration,
    ) -> Self {
        Self {
            registry,
            resolver,
            sweeper,
            status,
            interval,
        }
    }

    /// Run until `stop` flips to true (or its sender goes away). Nothing
    /// short of that ends the loop: per-cycle failures are logged and the
    /// next cycle is scheduled regardless.
    pub async fn run(self, mut stop: watch::Receiver<bool>) {
        info!("update scheduler started, interval {:?}", self.interval);

        loop {
            if *stop.borrow() {
                break;
            }

            let started = Instant::now();
            self.run_cycle().await;
            self.status.mark_cycle(started);

            let elapsed = started.elapsed();
            let Some(time_left) = self.interval.checked_sub(elapsed) else {
                debug!("cycle ran {elapsed:?}, past the interval; not sleeping");
                continue;
            };

            tokio::select! {
                _ = time::sleep(time_left) => {}
                changed = stop.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        info!("update scheduler stopped");
    }

    /// One pass over every registered subnet, sequential on purpose: a
    /// single sweep already fans out internally, and stacking sweeps on top
    /// of each other would defeat the concurrency bound.
    async fn run_cycle(&self) {
        let records = match self.registry.devices().await {
            Ok(records) => records,
            Err(e) => {
                warn!("could not read device registry: {e:#}");
                return;
            }
        };

        let mut swept: HashSet<Subnet> = HashSet::new();
        for record in &records {
            let resolved = match self.resolver.resolve(record.network.network()).await {
                Ok(Some(subnet)) => subnet,
                Ok(None) => {
                    // Registered on a segment this host is no longer
                    // attached to; skip silently.
                    debug!("no local route for {}", record.network);
                    continue;
                }
                Err(e) => {
                    warn!("route lookup failed for {}: {e}", record.network);
                    continue;
                }
            };

            if !swept.insert(resolved) {
                continue;
            }

            debug!("sweeping {resolved} for {}", record.name);
            if let Err(e) = self.sweeper.sweep(&resolved).await {
                error!("sweep of {resolved} failed: {e}");
            }
        }
    }
}
