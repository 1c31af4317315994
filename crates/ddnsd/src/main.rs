// # ddnsd - one-shot DDNS updater
//
// Thin integration layer: reads configuration from the environment, builds
// the PowerDNS provider, publishes one already-detected IP address and
// exits. IP detection and scheduling live outside this binary (cron, a
// systemd timer, a hook script).
//
// The binary owns the two things providers only borrow: the HTTP client
// (with its own timeout) and the cancellable context, which is cancelled on
// SIGINT/SIGTERM.
//
// ## Configuration
//
// ### Record
// - `DDNS_DOMAIN`: Zone name (required)
// - `DDNS_OWNER`: Host label, `@` for the zone root (default: `@`)
// - `DDNS_IP_VERSION`: `ipv4`, `ipv6` or `ipv4 or ipv6` (default: `ipv4 or ipv6`)
// - `DDNS_IPV6_SUFFIX`: IPv6 interface suffix, e.g. `::1/64` (optional)
// - `DDNS_IP`: The address to publish (required)
//
// ### PowerDNS
// - `DDNS_POWERDNS_SERVER_URL`: API base URL, e.g. `http://127.0.0.1:8081`
// - `DDNS_POWERDNS_API_KEY`: API key
// - `DDNS_POWERDNS_SERVER_ID`: Server id (default: `localhost`)
// - `DDNS_POWERDNS_TTL`: Record TTL in seconds (default: 300)
//
// ### Runtime
// - `DDNS_HTTP_TIMEOUT_SECS`: Per-request client timeout (default: 10)
// - `DDNS_UPDATE_TIMEOUT_SECS`: Overall update deadline (default: 30)
// - `DDNS_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export DDNS_DOMAIN=example.com
// export DDNS_OWNER=home
// export DDNS_POWERDNS_SERVER_URL=http://127.0.0.1:8081
// export DDNS_POWERDNS_API_KEY=changeme
// DDNS_IP=203.0.113.10 ddnsd
// ```

use anyhow::{Context as _, Result};
use ddns_core::{CancelHandle, Context, DnsProvider, IpVersion, Ipv6Suffix, Secret};
use ddns_provider_powerdns::PowerDnsProvider;
use std::env;
use std::net::IpAddr;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// - 0: Record updated
/// - 1: Configuration or startup error
/// - 2: Update failed or was interrupted
#[derive(Debug, Clone, Copy)]
enum DdnsExitCode {
    Updated = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
#[derive(Debug)]
struct Config {
    domain: String,
    owner: String,
    ip_version: IpVersion,
    ipv6_suffix: Option<Ipv6Suffix>,
    ip: IpAddr,
    server_url: String,
    api_key: Secret,
    server_id: Option<String>,
    ttl: Option<u32>,
    http_timeout: Duration,
    update_timeout: Duration,
    log_level: Level,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, validating every value
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let domain = var("DDNS_DOMAIN").context(
            "DDNS_DOMAIN is required. Set it via: export DDNS_DOMAIN=example.com",
        )?;

        let ip = var("DDNS_IP")
            .context("DDNS_IP is required. Set it via: export DDNS_IP=203.0.113.10")?;
        let ip: IpAddr = ip
            .parse()
            .with_context(|| format!("DDNS_IP '{}' is not an IP address", ip))?;

        let ip_version = match var("DDNS_IP_VERSION") {
            Some(v) => v.parse::<IpVersion>().context("DDNS_IP_VERSION")?,
            None => IpVersion::default(),
        };

        let ipv6_suffix = var("DDNS_IPV6_SUFFIX")
            .map(|v| v.parse::<Ipv6Suffix>())
            .transpose()
            .context("DDNS_IPV6_SUFFIX")?;

        let ttl = var("DDNS_POWERDNS_TTL")
            .map(|v| v.parse::<u32>())
            .transpose()
            .context("DDNS_POWERDNS_TTL must be a number of seconds")?;

        let http_timeout = seconds(var("DDNS_HTTP_TIMEOUT_SECS"), 10, "DDNS_HTTP_TIMEOUT_SECS")?;
        let update_timeout =
            seconds(var("DDNS_UPDATE_TIMEOUT_SECS"), 30, "DDNS_UPDATE_TIMEOUT_SECS")?;

        let log_level = match var("DDNS_LOG_LEVEL")
            .unwrap_or_else(|| "info".to_string())
            .to_lowercase()
            .as_str()
        {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            other => anyhow::bail!(
                "DDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                other
            ),
        };

        Ok(Self {
            domain,
            owner: var("DDNS_OWNER").unwrap_or_else(|| "@".to_string()),
            ip_version,
            ipv6_suffix,
            ip,
            server_url: var("DDNS_POWERDNS_SERVER_URL").unwrap_or_default(),
            api_key: Secret::new(var("DDNS_POWERDNS_API_KEY").unwrap_or_default()),
            server_id: var("DDNS_POWERDNS_SERVER_ID"),
            ttl,
            http_timeout,
            update_timeout,
            log_level,
        })
    }

    /// Provider settings block, in the shape the provider decodes
    fn provider_settings(&self) -> serde_json::Value {
        let mut settings = serde_json::json!({
            "server_url": self.server_url,
            "api_key": self.api_key.expose(),
        });
        if let Some(server_id) = &self.server_id {
            settings["server_id"] = serde_json::json!(server_id);
        }
        if let Some(ttl) = self.ttl {
            settings["ttl"] = serde_json::json!(ttl);
        }
        settings
    }

    fn build_provider(&self) -> ddns_core::Result<PowerDnsProvider> {
        PowerDnsProvider::new(
            &self.provider_settings(),
            self.domain.clone(),
            self.owner.clone(),
            self.ip_version,
            self.ipv6_suffix,
        )
    }
}

/// Parse a timeout in seconds, accepting 1 to 300
fn seconds(value: Option<String>, default: u64, name: &str) -> Result<Duration> {
    let secs = match value {
        Some(v) => v
            .parse::<u64>()
            .with_context(|| format!("{} must be a number of seconds. Got: {}", name, v))?,
        None => default,
    };
    if !(1..=300).contains(&secs) {
        anyhow::bail!("{} must be between 1 and 300 seconds. Got: {}", name, secs);
    }
    Ok(Duration::from_secs(secs))
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    // Fail fast, before any runtime or network activity
    let provider = match config.build_provider() {
        Ok(provider) => provider,
        Err(e) => {
            error!("Provider configuration error: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    info!("Starting ddnsd for {}", provider);

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run(&config, &provider).await {
            Ok(ip) => {
                info!("{} now points at {}", provider.build_domain_name(), ip);
                DdnsExitCode::Updated
            }
            Err(e) => {
                error!("Update failed: {:#}", e);
                DdnsExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Publish the configured IP through `provider`
async fn run(config: &Config, provider: &dyn DnsProvider) -> Result<IpAddr> {
    let client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .context("building HTTP client")?;

    let (ctx, handle) = Context::with_cancel();
    let ctx = ctx.with_timeout(config.update_timeout);
    tokio::spawn(cancel_on_shutdown(handle));

    let ip = provider
        .update(&ctx, &client, config.ip)
        .await
        .with_context(|| format!("updating {}", provider.build_domain_name()))?;

    Ok(ip)
}

/// Cancel the update context when a shutdown signal arrives
async fn cancel_on_shutdown(handle: CancelHandle) {
    match wait_for_shutdown().await {
        Ok(signal) => {
            info!("Received {}, cancelling update", signal);
            handle.cancel();
        }
        Err(e) => error!("Shutdown signal handling unavailable: {}", e),
    }
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
