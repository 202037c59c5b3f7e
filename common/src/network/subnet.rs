use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use anyhow::Context;
use pnet::ipnetwork::Ipv4Network;

/// A locally attached IPv4 subnet.
///
/// Always normalized to its network address, so two values compare equal
/// whenever they describe the same (network, prefix) pair regardless of
/// which member address they were derived from. That is what lets repeated
/// route lookups for devices on the same segment de-duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subnet(Ipv4Network);

impl Subnet {
    pub fn new(addr: Ipv4Addr, prefix: u8) -> anyhow::Result<Self> {
        let net = Ipv4Network::new(addr, prefix)?;
        Ok(Self(Ipv4Network::new(net.network(), prefix)?))
    }

    pub fn network(&self) -> Ipv4Addr {
        self.0.network()
    }

    pub fn broadcast(&self) -> Ipv4Addr {
        self.0.broadcast()
    }

    pub fn prefix(&self) -> u8 {
        self.0.prefix()
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        self.0.contains(addr)
    }

    /// Iterate the probeable host addresses in ascending order: everything
    /// strictly between the network and broadcast addresses.
    ///
    /// A /31 or /32 has no address in that open interval and yields nothing.
    /// Each call produces a fresh iterator.
    pub fn hosts(&self) -> impl Iterator<Item = Ipv4Addr> {
        let network: u32 = self.network().into();
        let broadcast: u32 = self.broadcast().into();
        (network.saturating_add(1)..broadcast).map(Ipv4Addr::from)
    }
}

impl FromStr for Subnet {
    type Err = anyhow::Error;

    /// Parses CIDR notation like "192.168.1.0/24".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (ip_str, prefix_str) = s
            .split_once('/')
            .with_context(|| format!("'{s}' is not in CIDR notation"))?;

        let addr: Ipv4Addr = ip_str
            .parse()
            .with_context(|| format!("invalid address in '{s}'"))?;
        let prefix: u8 = prefix_str
            .parse()
            .with_context(|| format!("invalid prefix in '{s}'"))?;

        Self::new(addr, prefix)
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.prefix())
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
