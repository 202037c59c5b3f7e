use std::time::Duration;

/// Startup configuration for the probing engine.
///
/// Every knob here used to be a fixed constant; they are surfaced so the
/// front end can expose them as flags.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Maximum router hops a probe packet may traverse.
    ///
    /// Kept at 1 by default so probes cannot leave the directly attached
    /// link. Probing through routers is out of scope.
    pub hop_limit: u8,

    /// Per-probe round-trip timeout.
    pub probe_timeout: Duration,

    /// Maximum number of probes in flight during a single sweep.
    pub sweep_concurrency: usize,

    /// Target spacing between sweep cycle starts.
    pub update_interval: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            hop_limit: 1,
            probe_timeout: Duration::from_secs(1),
            // Enough to clear a /24 quickly without flooding the host.
            sweep_concurrency: 64,
            update_interval: Duration::from_secs(300),
        }
    }
}
