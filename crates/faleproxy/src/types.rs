//! Wire types for the relay endpoint

use serde::{Deserialize, Serialize};

/// Body of a `POST /fetch` request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayRequest {
    /// The page to fetch (required, must be http:// or https://)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl RelayRequest {
    /// Create a new request with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
        }
    }

    /// The requested URL, treating an empty string as absent
    pub fn target(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.is_empty())
    }
}

/// Successful relay response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayResponse {
    /// Always true; failures use [`ErrorResponse`]
    pub success: bool,

    /// The rewritten HTML document
    pub content: String,

    /// Rewritten `<title>` text
    pub title: String,

    /// The requested URL, unchanged
    pub original_url: String,

    /// Number of occurrences replaced
    pub replacement_count: usize,
}

/// Error payload returned for 4xx and 5xx responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human readable message
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
