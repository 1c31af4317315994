// # ddns-core
//
// Provider contract and shared helpers for the DDNS updater.
//
// ## Architecture Overview
//
// - **DnsProvider**: Trait every provider implements; the scheduler only
//   ever sees `dyn DnsProvider`
// - **Context**: Caller-owned cancellation and deadline for one update
// - **Error**: One error type across providers (config, transport,
//   cancellation, API status)
// - Shared helpers: domain validation, record naming, request headers,
//   display rows, secret handling
//
// ## Design Principles
//
// 1. **Validate once**: providers are built from raw settings, fail fast and
//    are immutable afterwards
// 2. **Borrowed transport**: the HTTP client is owned by the caller
// 3. **Single-shot**: one request per update, retries belong to the caller

pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod presentation;
pub mod record;
pub mod secret;
pub mod traits;
pub mod validation;

// Re-export core types for convenience
pub use config::{IpVersion, Ipv6Suffix};
pub use context::{CancelHandle, Context};
pub use error::{Error, Result};
pub use presentation::HtmlRow;
pub use record::RecordType;
pub use secret::Secret;
pub use traits::DnsProvider;
