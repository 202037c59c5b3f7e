use std::fmt;
use std::str::FromStr;

use pnet::util::MacAddr;

/// Normalized link-layer identifier as reported by the neighbor cache.
///
/// Stored as raw octets and rendered uppercase, so identifiers compare equal
/// no matter which case the OS printed them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinkLayerId([u8; 6]);

/// Token shape check used when scanning neighbor table lines: a link-layer
/// address is colon delimited with exactly five colons.
pub fn is_lladdr_shaped(token: &str) -> bool {
    token.bytes().filter(|b| *b == b':').count() == 5
}

impl FromStr for LinkLayerId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mac: MacAddr = s
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid link-layer address '{s}': {e:?}"))?;
        Ok(Self([mac.0, mac.1, mac.2, mac.3, mac.4, mac.5]))
    }
}

impl fmt::Display for LinkLayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}
