//! Error types for booking client operations.
//!
//! These errors cover infrastructure problems only: the request could not be
//! built, sent, or its body could not be read or decoded. An unexpected HTTP
//! status is not an error at this layer; callers receive the full
//! [`ApiResponse`](crate::ApiResponse) and decide what the status means.

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur while talking to the booking service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configured base URL could not be parsed or cannot be a base.
    #[error("Invalid base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// No response arrived within the per-request timeout.
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// Connection refused, DNS failure, TLS failure or a broken body stream.
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The response body was not the JSON shape the caller asked for.
    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl Error {
    /// Whether this error describes an infrastructure failure (timeout or
    /// transport) rather than a problem with the response content.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Timeout { .. } | Error::Transport { .. })
    }

    pub(crate) fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Error::Timeout {
                url: url.to_string(),
            }
        } else {
            Error::Transport {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }
}
