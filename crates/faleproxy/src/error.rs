//! Error types for Faleproxy

use thiserror::Error;

/// Errors that can occur while fetching a page for rewriting
#[derive(Debug, Error)]
pub enum FetchError {
    /// URL is missing
    #[error("URL is required")]
    MissingUrl,

    /// URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// URL has invalid scheme
    #[error("Invalid URL: must start with http:// or https://")]
    InvalidUrlScheme,

    /// URL is blocked by prefix list
    #[error("Blocked URL: prefix not allowed")]
    BlockedUrl,

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client: {0}")]
    ClientBuildError(#[source] reqwest::Error),

    /// Request did not complete within the configured timeout
    #[error("Request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    /// Failed to connect to server
    #[error("Failed to connect to server: {0}")]
    ConnectError(#[source] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("HTTP status {0}")]
    HttpStatus(reqwest::StatusCode),

    /// Upstream returned binary content
    #[error("Binary content is not supported: {0}")]
    BinaryContent(String),

    /// Response body exceeded the configured limit
    #[error("Response body exceeds {0} bytes")]
    BodyTooLarge(usize),

    /// Other request error
    #[error("Request failed: {0}")]
    RequestError(String),
}

impl FetchError {
    /// Create an error from a reqwest error
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(err)
        } else if err.is_connect() {
            FetchError::ConnectError(err)
        } else if let Some(status) = err.status() {
            FetchError::HttpStatus(status)
        } else {
            FetchError::RequestError(err.to_string())
        }
    }
}
