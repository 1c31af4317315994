//! HTTP helpers shared by provider implementations
//!
//! Providers build their own requests but attach the common headers and
//! condense error bodies through these functions, so every provider looks
//! the same on the wire and in error messages.

use crate::error::Result;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{RequestBuilder, Response};

/// User agent sent with every provider request
pub const USER_AGENT_VALUE: &str = concat!("ddns/", env!("CARGO_PKG_VERSION"));

/// Longest body excerpt kept in error messages
pub const MAX_BODY_EXCERPT: usize = 512;

/// Most bytes read from an error response body
///
/// Enough for [`MAX_BODY_EXCERPT`] characters of any width plus one more, so
/// an overlong body still shows as truncated.
pub const MAX_BODY_BYTES: usize = 4 * (MAX_BODY_EXCERPT + 1);

/// Attach the updater's user agent
pub fn set_user_agent(request: RequestBuilder) -> RequestBuilder {
    request.header(USER_AGENT, USER_AGENT_VALUE)
}

/// Attach a content type header
pub fn set_content_type(request: RequestBuilder, content_type: &str) -> RequestBuilder {
    request.header(CONTENT_TYPE, content_type)
}

/// Read the start of a response body, at most [`MAX_BODY_BYTES`]
///
/// The rest of the body is never buffered. Invalid UTF-8, including a
/// character split at the cut, is replaced rather than rejected.
pub async fn read_body_prefix(mut response: Response) -> Result<String> {
    let mut buf = Vec::new();
    while buf.len() < MAX_BODY_BYTES {
        match response.chunk().await? {
            Some(chunk) => buf.extend_from_slice(&chunk),
            None => break,
        }
    }
    buf.truncate(MAX_BODY_BYTES);
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Flatten a response body into one short line for error messages
///
/// Line breaks are removed, whitespace runs collapse to a single space and
/// the result is cut to [`MAX_BODY_EXCERPT`] characters.
pub fn to_single_line(body: &str) -> String {
    let flattened = body.split_whitespace().collect::<Vec<_>>().join(" ");

    match flattened.char_indices().nth(MAX_BODY_EXCERPT) {
        Some((cut, _)) => format!("{}...", &flattened[..cut]),
        None => flattened,
    }
}
