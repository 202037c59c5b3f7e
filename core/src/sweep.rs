//! Bounded-concurrency reachability sweeps.
//!
//! A sweep never reads probe replies. Its entire purpose is the side effect:
//! making the kernel resolve (or refresh) a neighbor cache entry for every
//! host address it touches. The neighbor cache reader picks the results up
//! afterwards.

use std::net::Ipv4Addr;
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, trace};

use whoshome_common::config::ProbeConfig;
use whoshome_common::error::ProbeInfraError;
use whoshome_common::network::subnet::Subnet;

/// A single reachability probe against one host address.
#[async_trait]
pub trait Prober: Send + Sync {
    /// `Ok` whether or not the host answered; only failing to issue the
    /// probe at all is an error.
    async fn probe(&self, addr: Ipv4Addr) -> Result<(), ProbeInfraError>;
}

/// Probe implementation shelling out to `ping`.
///
/// One echo request, a short timeout, and a TTL low enough that the packet
/// cannot cross a router, so only directly attached hosts are ever touched.
pub struct IcmpProber {
    hop_limit: u8,
    timeout_secs: u64,
}

impl IcmpProber {
    pub fn new(config: &ProbeConfig) -> Self {
        Self {
            hop_limit: config.hop_limit.max(1),
            timeout_secs: config.probe_timeout.as_secs().max(1),
        }
    }
}

#[async_trait]
impl Prober for IcmpProber {
    async fn probe(&self, addr: Ipv4Addr) -> Result<(), ProbeInfraError> {
        let mut ping = Command::new("ping");
        ping.arg("-c")
            .arg("1")
            .arg("-t")
            .arg(self.hop_limit.to_string())
            .arg("-W")
            .arg(self.timeout_secs.to_string())
            .arg(addr.to_string())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let status = ping
            .status()
            .await
            .map_err(|source| ProbeInfraError::CommandUnavailable {
                command: "ping",
                source,
            })?;

        if !status.success() {
            trace!("no answer from {addr}");
        }
        Ok(())
    }
}

/// Sweep seam the scheduler drives; lets tests substitute a recording fake.
#[async_trait]
pub trait Sweeper: Send + Sync {
    async fn sweep(&self, subnet: &Subnet) -> Result<(), ProbeInfraError>;
}

/// Fans one probe out to every host address of a subnet, with at most
/// `concurrency` probes in flight at once.
pub struct PingSweeper {
    prober: Arc<dyn Prober>,
    concurrency: usize,
}

impl PingSweeper {
    pub fn new(config: &ProbeConfig) -> Self {
        Self::with_prober(Arc::new(IcmpProber::new(config)), config.sweep_concurrency)
    }

    pub fn with_prober(prober: Arc<dyn Prober>, concurrency: usize) -> Self {
        Self {
            prober,
            concurrency: concurrency.max(1),
        }
    }
}

#[async_trait]
impl Sweeper for PingSweeper {
    /// Returns once every probe has completed or timed out. Carries no
    /// per-address results; hosts that stayed silent simply get no fresh
    /// neighbor entry. Only an unusable probing primitive is an error.
    async fn sweep(&self, subnet: &Subnet) -> Result<(), ProbeInfraError> {
        let permits = Arc::new(Semaphore::new(self.concurrency));
        let mut probes = JoinSet::new();

        for addr in subnet.hosts() {
            let prober = Arc::clone(&self.prober);
            let permits = Arc::clone(&permits);
            probes.spawn(async move {
                // The semaphore is never closed; acquire only bounds how
                // many probes run at once.
                let _permit = permits.acquire().await.expect("semaphore closed");
                prober.probe(addr).await
            });
        }

        let mut first_failure = None;
        while let Some(joined) = probes.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    if first_failure.is_none() {
                        first_failure = Some(e);
                    }
                }
                Err(e) => debug!("probe task panicked: {e}"),
            }
        }

        match first_failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
