//! Error types for the DDNS system
//!
//! Every provider returns this error type so the scheduler can tell a bad
//! configuration, a refused update and an abandoned request apart without
//! parsing messages.

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS system
#[derive(Error, Debug)]
pub enum Error {
    /// The configured domain failed syntax validation
    #[error("domain is not valid: {0}")]
    DomainNotValid(String),

    /// The provider endpoint URL is missing
    #[error("URL is not set")]
    UrlNotSet,

    /// The provider endpoint URL could not be parsed
    #[error("URL is not valid: {0}")]
    UrlNotValid(String),

    /// The provider API key is missing
    #[error("API key is not set")]
    ApiKeyNotSet,

    /// The provider settings block could not be decoded
    #[error("configuration error: {0}")]
    Config(String),

    /// The request could not be built (body encoding, URL assembly)
    #[error("building request: {0}")]
    RequestBuild(String),

    /// The request never produced a response
    #[error("transport error: {0}")]
    Transport(String),

    /// The caller cancelled the operation
    #[error("operation cancelled")]
    Cancelled,

    /// The caller's deadline passed before the operation finished
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The provider answered with an unexpected HTTP status
    #[error("HTTP status is not valid: {status}: {body}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Response body flattened to a single line
        body: String,
    },
}

impl Error {
    /// Create a domain validation error
    pub fn domain(msg: impl Into<String>) -> Self {
        Self::DomainNotValid(msg.into())
    }

    /// Create a URL validation error
    pub fn url(msg: impl Into<String>) -> Self {
        Self::UrlNotValid(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a request building error
    pub fn request_build(msg: impl Into<String>) -> Self {
        Self::RequestBuild(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Whether this error was raised while constructing a provider
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::DomainNotValid(_)
                | Self::UrlNotSet
                | Self::UrlNotValid(_)
                | Self::ApiKeyNotSet
                | Self::Config(_)
        )
    }

    /// Whether the caller gave up on the operation
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }

    /// HTTP status code of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Some provider APIs take credentials in the query string.
        Self::Transport(err.without_url().to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::RequestBuild(err.to_string())
    }
}
