//! DNS record naming helpers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// DNS record type managed by the updater
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    /// A record (IPv4)
    #[serde(rename = "A")]
    A,
    /// AAAA record (IPv6)
    #[serde(rename = "AAAA")]
    Aaaa,
}

impl RecordType {
    /// Record type for an address, chosen from its family alone
    pub fn from_ip(ip: &IpAddr) -> Self {
        match ip {
            IpAddr::V4(_) => RecordType::A,
            IpAddr::V6(_) => RecordType::Aaaa,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_zone_root(owner: &str) -> bool {
    owner.is_empty() || owner == "@"
}

/// Hostname a record resolves under, for display and links
///
/// `@` is the zone itself and `*` is shown through the `any` label.
pub fn build_domain_name(owner: &str, domain: &str) -> String {
    match owner {
        "*" => format!("any.{}", domain),
        owner if is_zone_root(owner) => domain.to_string(),
        owner => format!("{}.{}", owner, domain),
    }
}

/// Fully qualified record name as provider APIs expect it, without the
/// trailing root dot
pub fn build_fqdn(owner: &str, domain: &str) -> String {
    if is_zone_root(owner) {
        domain.to_string()
    } else {
        format!("{}.{}", owner, domain)
    }
}
