//! Credential wrapper
//!
//! ⚠️ A `Secret` must never reach a log line or an error message. It has no
//! `Display`, its `Debug` prints a redaction marker, and the only way to read
//! it is [`Secret::expose`], which providers call when building the request
//! header.

use serde::Deserialize;
use std::fmt;

/// An API key or token
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw value, for request authentication only
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<REDACTED>")
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}
