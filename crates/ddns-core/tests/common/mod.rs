//! Test doubles and common utilities for provider contract tests
//!
//! The doubles implement `DnsProvider` without touching the network so the
//! contract can be checked from the scheduler's side.

use ddns_core::presentation::{self, HtmlRow};
use ddns_core::{Context, DnsProvider, Error, IpVersion, Ipv6Suffix, Result};
use std::collections::HashMap;
use std::fmt;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// What a mock provider does when asked to update
#[derive(Debug, Clone, Copy)]
pub enum Outcome {
    /// Accept the update
    Accept,
    /// Refuse with this HTTP status
    Refuse(u16),
    /// Never answer
    Hang,
}

/// A DnsProvider that records calls instead of sending requests
pub struct MockDnsProvider {
    domain: String,
    owner: String,
    ip_version: IpVersion,
    outcome: Outcome,
    /// Call counter for update()
    update_call_count: Arc<AtomicUsize>,
    /// Addresses passed to update(), in call order
    requested_ips: Arc<Mutex<Vec<IpAddr>>>,
}

impl MockDnsProvider {
    pub fn new(domain: &str, owner: &str, outcome: Outcome) -> Self {
        Self {
            domain: domain.to_string(),
            owner: owner.to_string(),
            ip_version: IpVersion::Ipv4OrIpv6,
            outcome,
            update_call_count: Arc::new(AtomicUsize::new(0)),
            requested_ips: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get the number of times update() was called
    pub fn update_call_count(&self) -> usize {
        self.update_call_count.load(Ordering::SeqCst)
    }

    /// Get the addresses update() was called with
    pub fn requested_ips(&self) -> Vec<IpAddr> {
        self.requested_ips.lock().unwrap().clone()
    }

    /// Create a new MockDnsProvider that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            domain: other.domain.clone(),
            owner: other.owner.clone(),
            ip_version: other.ip_version,
            outcome: other.outcome,
            update_call_count: Arc::clone(&other.update_call_count),
            requested_ips: Arc::clone(&other.requested_ips),
        }
    }
}

impl fmt::Display for MockDnsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&presentation::describe(
            &self.domain,
            &self.owner,
            "mock",
            self.ip_version,
        ))
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    fn domain(&self) -> &str {
        &self.domain
    }

    fn owner(&self) -> &str {
        &self.owner
    }

    fn ip_version(&self) -> IpVersion {
        self.ip_version
    }

    fn ipv6_suffix(&self) -> Option<Ipv6Suffix> {
        None
    }

    fn proxied(&self) -> bool {
        false
    }

    fn html(&self) -> HtmlRow {
        HtmlRow {
            domain: presentation::host_link(&self.build_domain_name()),
            owner: self.owner.clone(),
            provider: "mock".to_string(),
            ip_version: self.ip_version.to_string(),
        }
    }

    async fn update(&self, ctx: &Context, _client: &reqwest::Client, ip: IpAddr) -> Result<IpAddr> {
        self.update_call_count.fetch_add(1, Ordering::SeqCst);
        self.requested_ips.lock().unwrap().push(ip);

        match self.outcome {
            Outcome::Accept => Ok(ip),
            Outcome::Refuse(status) => Err(Error::http_status(status, "refused")),
            Outcome::Hang => ctx.run(std::future::pending::<IpAddr>()).await,
        }
    }
}

/// Minimal stand-in for the scheduler: remembers the last confirmed IP per
/// record and only moves it forward on success
#[derive(Default)]
pub struct LastKnownGood {
    ips: HashMap<String, IpAddr>,
}

impl LastKnownGood {
    pub async fn publish(
        &mut self,
        provider: &dyn DnsProvider,
        ctx: &Context,
        client: &reqwest::Client,
        ip: IpAddr,
    ) -> Result<()> {
        let confirmed = provider.update(ctx, client, ip).await?;
        self.ips.insert(provider.build_domain_name(), confirmed);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<IpAddr> {
        self.ips.get(name).copied()
    }
}
