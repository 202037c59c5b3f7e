//! Local route table lookups.
//!
//! Maps an address to the locally attached subnet that encloses it, by way
//! of the OS routing table. Only link-scope CIDR routes matter here; default
//! routes and host routes are not something we can sweep.

use std::net::Ipv4Addr;

use async_trait::async_trait;
use tokio::process::Command;

use whoshome_common::error::ProbeInfraError;
use whoshome_common::network::subnet::Subnet;

/// Resolution seam so the scheduler can be driven with a fake table.
#[async_trait]
pub trait SubnetResolver: Send + Sync {
    /// `Ok(None)` when no local route covers the address. That is a normal
    /// outcome (the address lives behind a router), not an error.
    async fn resolve(&self, addr: Ipv4Addr) -> Result<Option<Subnet>, ProbeInfraError>;
}

/// Resolver backed by the real OS route table (`ip -4 route`).
pub struct SystemRouteTable;

#[async_trait]
impl SubnetResolver for SystemRouteTable {
    async fn resolve(&self, addr: Ipv4Addr) -> Result<Option<Subnet>, ProbeInfraError> {
        let output = Command::new("ip")
            .args(["-4", "route"])
            .output()
            .await
            .map_err(|source| ProbeInfraError::CommandUnavailable {
                command: "ip route",
                source,
            })?;

        let stdout = crate::command::stdout_utf8("ip route", output)?;
        Ok(first_containing(&stdout, addr))
    }
}

/// First CIDR route in table order whose subnet contains `addr`.
///
/// No longest-prefix selection happens on purpose: the route table's own
/// ordering wins, matching how the table is consulted elsewhere.
pub fn first_containing(route_output: &str, addr: Ipv4Addr) -> Option<Subnet> {
    route_output
        .lines()
        .filter_map(parse_route_line)
        .find(|subnet| subnet.contains(addr))
}

/// Example line:
/// `172.18.0.0/16 dev br0  proto kernel  scope link  src 172.18.0.1`
///
/// Only the leading destination token is consumed, and only when it carries
/// a prefix delimiter.
fn parse_route_line(line: &str) -> Option<Subnet> {
    let dest = line.split_whitespace().next()?;
    if !dest.contains('/') {
        return None;
    }
    dest.parse().ok()
}
