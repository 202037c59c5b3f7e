//! Neighbor cache access.
//!
//! Reads the kernel's link-layer neighbor table through `ip neighbor` and
//! turns it into typed entries. This is the read side of presence detection;
//! the sweeper's only job is to keep this table populated.

use std::collections::BTreeSet;
use std::net::IpAddr;

use tokio::process::Command;
use tracing::debug;

use whoshome_common::error::ProbeInfraError;
use whoshome_common::network::mac::{self, LinkLayerId};

/// Freshness state the kernel reports for a neighbor entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborState {
    Reachable,
    Stale,
    /// Anything else (incomplete, failed, permanent, ...). Still a table
    /// entry, but not counted as present on the network.
    Other,
}

impl NeighborState {
    fn from_token(token: &str) -> Self {
        if token.eq_ignore_ascii_case("reachable") {
            Self::Reachable
        } else if token.eq_ignore_ascii_case("stale") {
            Self::Stale
        } else {
            Self::Other
        }
    }

    /// Whether this state counts as "currently on the network".
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Reachable | Self::Stale)
    }
}

/// One parsed line of the neighbor table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborEntry {
    pub addr: IpAddr,
    pub lladdr: LinkLayerId,
    pub state: NeighborState,
}

/// Query the OS neighbor cache.
///
/// Empty output is just an empty table; only a failure to run `ip neighbor`
/// itself is an error.
pub async fn read_neighbor_cache() -> Result<Vec<NeighborEntry>, ProbeInfraError> {
    let output = Command::new("ip")
        .arg("neighbor")
        .output()
        .await
        .map_err(|source| ProbeInfraError::CommandUnavailable {
            command: "ip neighbor",
            source,
        })?;

    let stdout = crate::command::stdout_utf8("ip neighbor", output)?;
    Ok(parse_neighbor_output(&stdout))
}

/// Parse the whole neighbor table. Lines that do not look like neighbor
/// entries (blank lines, rows without a resolved link-layer address,
/// unparsable addresses) are skipped, never raised.
pub fn parse_neighbor_output(output: &str) -> Vec<NeighborEntry> {
    output.lines().filter_map(parse_neighbor_line).collect()
}

/// Expected shape: `<address> dev <iface> lladdr <mac> <STATE>`, with missing
/// or extra fields tolerated.
///
/// A line qualifies only if exactly one token past the address is link-layer
/// shaped: zero means the kernel has not resolved an address yet, more than
/// one is ambiguous, and both cases are skipped.
fn parse_neighbor_line(line: &str) -> Option<NeighborEntry> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let addr: IpAddr = tokens.first()?.parse().ok()?;

    let mut shaped = tokens[1..]
        .iter()
        .copied()
        .filter(|t| mac::is_lladdr_shaped(t));
    let lladdr_token = shaped.next()?;
    if shaped.next().is_some() {
        debug!("skipping ambiguous neighbor line: {line}");
        return None;
    }

    let lladdr: LinkLayerId = lladdr_token.parse().ok()?;

    let state_token = tokens.last().copied()?;
    let state = if state_token == lladdr_token {
        NeighborState::Other
    } else {
        NeighborState::from_token(state_token)
    };

    Some(NeighborEntry {
        addr,
        lladdr,
        state,
    })
}

/// Collapse entries into the set of link-layer ids considered present:
/// REACHABLE and STALE rows only. Duplicate ids (one device seen under
/// several addresses or address families) coalesce through the set.
pub fn present_ids(entries: &[NeighborEntry]) -> BTreeSet<LinkLayerId> {
    entries
        .iter()
        .filter(|e| e.state.is_present())
        .map(|e| e.lladdr)
        .collect()
}
