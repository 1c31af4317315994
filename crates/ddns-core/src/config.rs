//! Configuration types shared by every provider
//!
//! Provider-specific settings blocks are decoded by each provider crate; the
//! types here describe the per-record policy that the scheduler hands to all
//! of them alike.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv6Addr};
use std::str::FromStr;

/// Which address families a record is managed for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IpVersion {
    /// IPv4 only (A records)
    #[serde(rename = "ipv4")]
    Ipv4,
    /// IPv6 only (AAAA records)
    #[serde(rename = "ipv6")]
    Ipv6,
    /// Both families
    #[default]
    #[serde(rename = "ipv4 or ipv6")]
    Ipv4OrIpv6,
}

impl IpVersion {
    /// Canonical textual form, as used in settings and display rows
    pub fn as_str(&self) -> &'static str {
        match self {
            IpVersion::Ipv4 => "ipv4",
            IpVersion::Ipv6 => "ipv6",
            IpVersion::Ipv4OrIpv6 => "ipv4 or ipv6",
        }
    }

    /// Whether an address of this family falls under the policy
    pub fn accepts(&self, ip: &IpAddr) -> bool {
        match self {
            IpVersion::Ipv4 => ip.is_ipv4(),
            IpVersion::Ipv6 => ip.is_ipv6(),
            IpVersion::Ipv4OrIpv6 => true,
        }
    }
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IpVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ipv4" => Ok(IpVersion::Ipv4),
            "ipv6" => Ok(IpVersion::Ipv6),
            "ipv4 or ipv6" | "" => Ok(IpVersion::Ipv4OrIpv6),
            other => Err(Error::config(format!(
                "IP version '{}' is not valid, expected one of: ipv4, ipv6, ipv4 or ipv6",
                other
            ))),
        }
    }
}

/// IPv6 interface suffix used to rebuild a stable address when only the
/// delegated network prefix changes
///
/// Written like a prefix, e.g. `::72ad:8fbb:a54e:bedd/64`: the length is the
/// number of leading bits kept from the detected address, and the remaining
/// low bits come from the suffix address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ipv6Suffix {
    suffix: Ipv6Addr,
    prefix_len: u8,
}

impl Ipv6Suffix {
    /// Create a suffix from its address and the network prefix length
    pub fn new(suffix: Ipv6Addr, prefix_len: u8) -> Result<Self, Error> {
        if prefix_len > 128 {
            return Err(Error::config(format!(
                "IPv6 suffix prefix length {} exceeds 128",
                prefix_len
            )));
        }
        Ok(Self { suffix, prefix_len })
    }

    /// Suffix address
    pub fn suffix(&self) -> Ipv6Addr {
        self.suffix
    }

    /// Number of leading bits taken from the detected address
    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Combine the network part of `ip` with the host part of the suffix
    pub fn apply(&self, ip: Ipv6Addr) -> Ipv6Addr {
        let network_mask = match self.prefix_len {
            0 => 0,
            len => u128::MAX << (128 - u32::from(len)),
        };
        let network = u128::from(ip) & network_mask;
        let host = u128::from(self.suffix) & !network_mask;
        Ipv6Addr::from(network | host)
    }
}

impl fmt::Display for Ipv6Suffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.suffix, self.prefix_len)
    }
}

impl FromStr for Ipv6Suffix {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, len) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| Error::config(format!("IPv6 suffix '{}' has no prefix length", s)))?;

        let suffix: Ipv6Addr = addr
            .parse()
            .map_err(|e| Error::config(format!("IPv6 suffix address '{}': {}", addr, e)))?;
        let prefix_len: u8 = len
            .parse()
            .map_err(|e| Error::config(format!("IPv6 suffix length '{}': {}", len, e)))?;

        Self::new(suffix, prefix_len)
    }
}

impl TryFrom<String> for Ipv6Suffix {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Ipv6Suffix> for String {
    fn from(value: Ipv6Suffix) -> Self {
        value.to_string()
    }
}
