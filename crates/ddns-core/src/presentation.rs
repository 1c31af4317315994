//! Display forms of a configured provider

use crate::config::IpVersion;
use serde::Serialize;

/// One row of the status table
///
/// `domain` and `provider` carry ready-made HTML links; `owner` and
/// `ip_version` are plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HtmlRow {
    pub domain: String,
    pub owner: String,
    pub provider: String,
    pub ip_version: String,
}

/// One-line identity of a provider instance, used for its `Display`
pub fn describe(domain: &str, owner: &str, provider: &str, ip_version: IpVersion) -> String {
    format!(
        "[domain: {} | owner: {} | provider: {} | ip: {}]",
        domain, owner, provider, ip_version
    )
}

/// HTML link for a hostname
pub fn host_link(host: &str) -> String {
    format!("<a href=\"http://{}\">{}</a>", host, host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_lists_every_field() {
        assert_eq!(
            describe("example.com", "@", "powerdns", IpVersion::Ipv4),
            "[domain: example.com | owner: @ | provider: powerdns | ip: ipv4]"
        );
    }

    #[test]
    fn host_link_points_at_host() {
        assert_eq!(
            host_link("home.example.com"),
            "<a href=\"http://home.example.com\">home.example.com</a>"
        );
    }
}
