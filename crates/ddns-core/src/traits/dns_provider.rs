// # DNS Provider Trait
//
// Defines the contract every DNS provider implements so a scheduler can
// drive any of them the same way.
//
// ## Implementations
//
// - PowerDNS: `ddns-provider-powerdns` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::{Context, DnsProvider};
// use std::time::Duration;
//
// async fn publish(provider: &dyn DnsProvider, client: &reqwest::Client) -> ddns_core::Result<()> {
//     let ctx = Context::background().with_timeout(Duration::from_secs(30));
//     let ip = "203.0.113.10".parse().unwrap();
//
//     let confirmed = provider.update(&ctx, client, ip).await?;
//     tracing::info!("{} now points at {}", provider.build_domain_name(), confirmed);
//     Ok(())
// }
// ```

use crate::config::{IpVersion, Ipv6Suffix};
use crate::context::Context;
use crate::presentation::HtmlRow;
use crate::record;
use async_trait::async_trait;
use std::fmt;
use std::net::IpAddr;

/// Trait for DNS provider implementations
///
/// A provider is an immutable, validated configuration for one record plus
/// the knowledge of how to talk to one provider API.
///
/// # Thread Safety
///
/// Implementations hold no mutable state, so one instance can serve
/// concurrent `update` calls from several tasks.
///
/// # Trust Level: Untrusted
///
/// ## Allowed Capabilities
/// - ✅ Perform HTTP/HTTPS API calls to their endpoints only
/// - ✅ Parse provider-specific responses
/// - ✅ Return success or failure (the scheduler handles retry)
///
/// ## Forbidden Capabilities
/// - ❌ Spawn tasks or threads
/// - ❌ Implement retry logic or backoff (owned by the scheduler)
/// - ❌ Cache state beyond a single request
/// - ❌ Own, reconfigure or cache the HTTP client (it is borrowed per call)
/// - ❌ Log or format credentials
#[async_trait]
pub trait DnsProvider: fmt::Display + Send + Sync {
    /// Zone the record lives in
    fn domain(&self) -> &str;

    /// Host label within the zone (`@` or empty for the zone root)
    fn owner(&self) -> &str;

    /// Address families this record is managed for
    fn ip_version(&self) -> IpVersion;

    /// IPv6 interface suffix configured for this record, if any
    fn ipv6_suffix(&self) -> Option<Ipv6Suffix>;

    /// Whether traffic for the record is proxied by the provider
    fn proxied(&self) -> bool;

    /// Hostname the record resolves under
    fn build_domain_name(&self) -> String {
        record::build_domain_name(self.owner(), self.domain())
    }

    /// Status table row for this provider
    fn html(&self) -> HtmlRow;

    /// Point the record at `ip`
    ///
    /// Sends exactly one API request through `client`, bounded by `ctx`.
    ///
    /// # Returns
    ///
    /// - `Ok(ip)`: the provider accepted the update; the same address is
    ///   returned so the caller can store it as last known good
    /// - `Err(Error)`: transport failure, cancellation or API refusal; the
    ///   caller decides whether to retry
    async fn update(
        &self,
        ctx: &Context,
        client: &reqwest::Client,
        ip: IpAddr,
    ) -> Result<IpAddr, crate::Error>;
}
