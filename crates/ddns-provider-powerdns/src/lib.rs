// # PowerDNS DNS Provider
//
// This crate provides a PowerDNS Authoritative Server provider for the DDNS
// system.
//
// ## Behavior
//
// - One `PATCH` per update, replacing the whole RRset (`changetype: REPLACE`),
//   so repeating an update is safe
// - A or AAAA chosen from the address family of the IP being published
// - Success is exactly `204 No Content`; any other status is returned as
//   `Error::HttpStatus` with the body condensed to one line
// - No retry, no backoff, no caching: the caller owns all of that
//
// ## Security Requirements
//
// - The API key NEVER appears in logs, errors or `Debug` output
// - Construction fails fast when the API key or server URL is empty
//
// ## API Reference
//
// - PowerDNS HTTP API: https://doc.powerdns.com/authoritative/http-api/
// - Modify RRsets: PATCH `/api/v1/servers/:server_id/zones/:zone_id`

use async_trait::async_trait;
use ddns_core::http::{read_body_prefix, set_content_type, set_user_agent, to_single_line};
use ddns_core::presentation::{self, HtmlRow};
use ddns_core::record::{self, RecordType};
use ddns_core::validation::check_domain;
use ddns_core::{Context, DnsProvider, Error, IpVersion, Ipv6Suffix, Result, Secret};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::net::IpAddr;
use url::Url;

/// Provider name used in display strings
pub const PROVIDER_NAME: &str = "powerdns";

/// Server id of a standalone PowerDNS instance
pub const DEFAULT_SERVER_ID: &str = "localhost";

/// TTL used when the settings leave it unset or zero
pub const DEFAULT_TTL: u32 = 300;

const API_DOC_URL: &str = "https://doc.powerdns.com/authoritative/http-api/";

/// Provider-specific settings block
///
/// Unknown keys are ignored so one settings object can carry keys meant for
/// other layers.
#[derive(Debug, Default, Deserialize)]
struct Settings {
    #[serde(default)]
    server_url: String,
    #[serde(default)]
    api_key: Secret,
    #[serde(default)]
    server_id: String,
    #[serde(default)]
    ttl: u32,
}

impl Settings {
    fn from_value(data: &Value) -> Result<Self> {
        if data.is_null() {
            return Ok(Self::default());
        }
        Self::deserialize(data)
            .map_err(|e| Error::config(format!("decoding PowerDNS settings: {}", e)))
    }
}

/// PowerDNS DNS provider
///
/// Immutable once built; see [`PowerDnsProvider::new`].
#[derive(Debug, Clone)]
pub struct PowerDnsProvider {
    domain: String,
    owner: String,
    ip_version: IpVersion,
    ipv6_suffix: Option<Ipv6Suffix>,
    server_url: Url,
    /// ⚠️ NEVER log this value
    api_key: Secret,
    server_id: String,
    ttl: u32,
}

impl PowerDnsProvider {
    /// Create a provider from a raw settings block
    ///
    /// # Parameters
    ///
    /// - `data`: JSON object with `server_url`, `api_key` and optionally
    ///   `server_id` (default `localhost`) and `ttl` (default 300)
    /// - `domain`: zone name, e.g. `example.com`
    /// - `owner`: host label in the zone, `@` for the zone root
    /// - `ip_version`: address families managed for this record
    /// - `ipv6_suffix`: optional IPv6 interface suffix
    ///
    /// # Errors
    ///
    /// Checked in this order, first failure wins:
    /// [`Error::DomainNotValid`], [`Error::UrlNotSet`], [`Error::ApiKeyNotSet`],
    /// [`Error::UrlNotValid`]. An undecodable block, or a `server_id` that
    /// is not a single path segment, is [`Error::Config`].
    pub fn new(
        data: &Value,
        domain: impl Into<String>,
        owner: impl Into<String>,
        ip_version: IpVersion,
        ipv6_suffix: Option<Ipv6Suffix>,
    ) -> Result<Self> {
        let mut settings = Settings::from_value(data)?;

        if settings.server_id.is_empty() {
            settings.server_id = DEFAULT_SERVER_ID.to_string();
        }
        if settings.ttl == 0 {
            settings.ttl = DEFAULT_TTL;
        }

        let domain = domain.into();
        let server_url = validate_settings(&domain, &settings.server_url, &settings.api_key)?;
        check_server_id(&settings.server_id)?;

        Ok(Self {
            domain,
            owner: owner.into(),
            ip_version,
            ipv6_suffix,
            server_url,
            api_key: settings.api_key,
            server_id: settings.server_id,
            ttl: settings.ttl,
        })
    }

    /// Zone endpoint the update is sent to
    ///
    /// Segments are appended to any path already in the server URL and
    /// percent-encoded as needed.
    fn zone_url(&self) -> Result<Url> {
        let zone = format!("{}.", self.domain);
        let mut url = self.server_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::request_build("server URL cannot carry a path"))?
            .pop_if_empty()
            .extend(["api", "v1", "servers", self.server_id.as_str(), "zones", zone.as_str()]);
        Ok(url)
    }

    /// Record name in canonical form, with the trailing root dot
    fn record_name(&self) -> String {
        format!("{}.", record::build_fqdn(&self.owner, &self.domain))
    }

    fn build_request_body(&self, ip: IpAddr) -> Result<Vec<u8>> {
        let request = PatchZoneRequest {
            rrsets: vec![RrSet {
                name: self.record_name(),
                record_type: RecordType::from_ip(&ip),
                ttl: self.ttl,
                changetype: ChangeType::Replace,
                records: vec![Record {
                    content: ip.to_string(),
                    disabled: false,
                }],
            }],
        };

        serde_json::to_vec(&request)
            .map_err(|e| Error::request_build(format!("json encoding request data: {}", e)))
    }

    fn set_headers(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = set_user_agent(request);
        let request = set_content_type(request, "application/json");
        request.header("X-API-Key", self.api_key.expose())
    }
}

fn validate_settings(domain: &str, server_url: &str, api_key: &Secret) -> Result<Url> {
    check_domain(domain)?;

    if server_url.is_empty() {
        return Err(Error::UrlNotSet);
    }
    if api_key.is_empty() {
        return Err(Error::ApiKeyNotSet);
    }

    let parsed = Url::parse(server_url)
        .map_err(|e| Error::url(format!("server URL '{}': {}", server_url, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::url(format!(
            "server URL '{}' must use http or https",
            server_url
        )));
    }

    Ok(parsed)
}

/// `server_id` lands in the request path as one segment
fn check_server_id(server_id: &str) -> Result<()> {
    if matches!(server_id, "." | "..") {
        return Err(Error::config(format!(
            "server_id '{}' is not a valid path segment",
            server_id
        )));
    }
    if let Some(c) = server_id.chars().find(|c| matches!(c, '/' | '?' | '#')) {
        return Err(Error::config(format!(
            "server_id '{}' must not contain '{}'",
            server_id, c
        )));
    }
    Ok(())
}

/// Body of `PATCH /zones/:zone_id`
#[derive(Debug, Serialize)]
struct PatchZoneRequest {
    rrsets: Vec<RrSet>,
}

#[derive(Debug, Serialize)]
struct RrSet {
    name: String,
    #[serde(rename = "type")]
    record_type: RecordType,
    ttl: u32,
    changetype: ChangeType,
    records: Vec<Record>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "UPPERCASE")]
enum ChangeType {
    Replace,
}

#[derive(Debug, Serialize)]
struct Record {
    content: String,
    disabled: bool,
}

impl fmt::Display for PowerDnsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&presentation::describe(
            &self.domain,
            &self.owner,
            PROVIDER_NAME,
            self.ip_version,
        ))
    }
}

#[async_trait]
impl DnsProvider for PowerDnsProvider {
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
        self.ipv6_suffix
    }

    fn proxied(&self) -> bool {
        false
    }

    fn html(&self) -> HtmlRow {
        HtmlRow {
            domain: presentation::host_link(&self.build_domain_name()),
            owner: self.owner.clone(),
            provider: format!("<a href=\"{}\">PowerDNS</a>", API_DOC_URL),
            ip_version: self.ip_version.to_string(),
        }
    }

    /// Replace the record's RRset with a single record holding `ip`
    ///
    /// # API Call
    ///
    /// ```http
    /// PATCH /api/v1/servers/localhost/zones/example.com.
    /// X-API-Key: <key>
    /// Content-Type: application/json
    ///
    /// {"rrsets": [{"name": "home.example.com.", "type": "A", "ttl": 300,
    ///   "changetype": "REPLACE",
    ///   "records": [{"content": "203.0.113.10", "disabled": false}]}]}
    /// ```
    async fn update(&self, ctx: &Context, client: &reqwest::Client, ip: IpAddr) -> Result<IpAddr> {
        let record_type = RecordType::from_ip(&ip);
        if !self.ip_version.accepts(&ip) {
            // Published anyway: enforcing the policy is the caller's job.
            tracing::warn!(
                "{} address {} does not match IP version policy '{}' of {}",
                record_type,
                ip,
                self.ip_version,
                self.record_name()
            );
        }

        let url = self.zone_url()?;
        let body = self.build_request_body(ip)?;

        tracing::debug!(
            "Sending PowerDNS RRset replace: {} {} -> {} (ttl {})",
            self.record_name(),
            record_type,
            ip,
            self.ttl
        );

        let request = self.set_headers(client.patch(url)).body(body);
        let response = ctx.run(request.send()).await??;

        let status = response.status();
        if status != StatusCode::NO_CONTENT {
            let text = ctx.run(read_body_prefix(response)).await?.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), to_single_line(&text)));
        }

        tracing::info!(
            "PowerDNS record updated: {} {} -> {}",
            self.record_name(),
            record_type,
            ip
        );
        Ok(ip)
    }
}
