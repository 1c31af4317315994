//! Core traits for the DDNS system
//!
//! - [`DnsProvider`]: Update DNS records via provider APIs

pub mod dns_provider;

pub use dns_provider::DnsProvider;
