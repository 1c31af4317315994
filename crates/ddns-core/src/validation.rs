//! Settings validation shared by providers

use crate::error::{Error, Result};

/// Maximum length of a domain name in text form (RFC 1035)
const MAX_DOMAIN_LEN: usize = 253;

/// Maximum length of a single label (RFC 1035)
const MAX_LABEL_LEN: usize = 63;

/// Validate that a string is a usable zone name
///
/// Basic RFC 1035 syntax: at least two labels, each 1-63 ASCII alphanumerics
/// or hyphens, no label starting or ending with a hyphen, and a top-level
/// label that is not purely numeric. Internationalized names must already be
/// in punycode form.
///
/// # Errors
///
/// Returns [`Error::DomainNotValid`] describing the first violation.
pub fn check_domain(domain: &str) -> Result<()> {
    if domain.is_empty() {
        return Err(Error::domain("domain name cannot be empty"));
    }

    if domain.len() > MAX_DOMAIN_LEN {
        return Err(Error::domain(format!(
            "domain name too long: {} chars (max {})",
            domain.len(),
            MAX_DOMAIN_LEN
        )));
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return Err(Error::domain(format!(
            "domain name '{}' must have at least two labels",
            domain
        )));
    }

    for label in &labels {
        check_label(domain, label)?;
    }

    let tld = labels[labels.len() - 1];
    if tld.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::domain(format!(
            "top-level label of '{}' cannot be numeric",
            domain
        )));
    }

    Ok(())
}

fn check_label(domain: &str, label: &str) -> Result<()> {
    if label.is_empty() {
        return Err(Error::domain(format!("domain name has empty label: '{}'", domain)));
    }

    if label.len() > MAX_LABEL_LEN {
        return Err(Error::domain(format!(
            "label too long: {} chars (max {}) in '{}'",
            label.len(),
            MAX_LABEL_LEN,
            domain
        )));
    }

    if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(Error::domain(format!(
            "label '{}' contains invalid characters (alphanumeric and hyphen only)",
            label
        )));
    }

    if label.starts_with('-') || label.ends_with('-') {
        return Err(Error::domain(format!(
            "label '{}' cannot start or end with a hyphen",
            label
        )));
    }

    Ok(())
}
