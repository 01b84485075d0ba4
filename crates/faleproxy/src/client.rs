//! Fetch options, URL validation and one-call entry points
//!
//! The actual transport lives in the [`fetchers`](crate::fetchers) module;
//! composition with the rewriter lives in [`Relay`](crate::Relay).

use crate::error::FetchError;
use crate::fetchers::{FetchedPage, Fetcher, HttpFetcher};
use crate::relay::Relay;
use crate::types::RelayResponse;
use std::time::Duration;
use url::Url;

/// Default per-request timeout (connect + full response)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default upper bound on response body size
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Fetch options that can be configured via the relay builder
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Custom User-Agent
    pub user_agent: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum accepted response body size in bytes
    pub max_body_bytes: usize,
    /// Allow list of URL prefixes
    pub allow_prefixes: Vec<String>,
    /// Block list of URL prefixes
    pub block_prefixes: Vec<String>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            user_agent: None,
            timeout: DEFAULT_TIMEOUT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            allow_prefixes: Vec::new(),
            block_prefixes: Vec::new(),
        }
    }
}

/// Validate a requested URL against scheme and prefix rules
pub fn validate_url(url: &str, options: &FetchOptions) -> Result<Url, FetchError> {
    if url.is_empty() {
        return Err(FetchError::MissingUrl);
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(FetchError::InvalidUrlScheme);
    }

    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

    if !options.allow_prefixes.is_empty() {
        let allowed = options
            .allow_prefixes
            .iter()
            .any(|prefix| url.starts_with(prefix));
        if !allowed {
            return Err(FetchError::BlockedUrl);
        }
    }

    if options
        .block_prefixes
        .iter()
        .any(|prefix| url.starts_with(prefix))
    {
        return Err(FetchError::BlockedUrl);
    }

    Ok(parsed)
}

/// Fetch a page without rewriting it
pub async fn fetch_page(url: &str, options: &FetchOptions) -> Result<FetchedPage, FetchError> {
    let parsed = validate_url(url, options)?;
    HttpFetcher::new().fetch(&parsed, options).await
}

/// Fetch a page and rewrite it with the default relay
///
/// For custom options, build a [`Relay`] with [`Relay::builder`].
pub async fn rewrite_url(url: &str) -> Result<RelayResponse, FetchError> {
    Relay::default().execute(url).await
}
