pub mod device;
pub mod run;
pub mod sweep;
pub mod who;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use whoshome_common::config::ProbeConfig;

#[derive(Parser)]
#[command(name = "whoshome")]
#[command(about = "Tracks which registered devices are on the local network.")]
pub struct CommandLine {
    /// Device registry file
    #[arg(long, default_value = "devices.json")]
    pub registry: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the background presence updater
    #[command(alias = "r")]
    Run(ProbeArgs),
    /// Show which registered devices are present right now
    #[command(alias = "w")]
    Who,
    /// Sweep a single subnet once
    Sweep {
        /// Subnet in CIDR form, e.g. 192.168.1.0/24
        subnet: String,
        #[command(flatten)]
        probe: ProbeArgs,
    },
    /// Register a device
    #[command(alias = "a")]
    Add {
        name: String,
        /// Link-layer address, e.g. aa:bb:cc:dd:ee:ff
        lladdr: String,
        /// Network the device lives on, in CIDR form
        network: String,
    },
    /// Forget a device
    Remove { name: String },
}

#[derive(Args)]
pub struct ProbeArgs {
    /// Probe hop limit; 1 keeps probes on the local link
    #[arg(long, default_value_t = 1)]
    pub hop_limit: u8,

    /// Per-probe timeout in seconds
    #[arg(long, default_value_t = 1)]
    pub probe_timeout: u64,

    /// Maximum probes in flight per sweep
    #[arg(long, default_value_t = 64)]
    pub concurrency: usize,

    /// Seconds between sweep cycle starts
    #[arg(long, default_value_t = 300)]
    pub interval: u64,
}

impl ProbeArgs {
    pub fn to_config(&self) -> ProbeConfig {
        ProbeConfig {
            hop_limit: self.hop_limit,
            probe_timeout: Duration::from_secs(self.probe_timeout),
            sweep_concurrency: self.concurrency,
            update_interval: Duration::from_secs(self.interval),
        }
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
