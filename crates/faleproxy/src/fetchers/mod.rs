//! Page fetchers
//!
//! A [`Fetcher`] turns a validated URL into the raw page body. The relay
//! only depends on the trait, so tests and embedders can swap in their own.

mod http;

pub use http::HttpFetcher;

use crate::client::FetchOptions;
use crate::error::FetchError;
use async_trait::async_trait;
use url::Url;

/// A fetched page, before rewriting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedPage {
    /// The URL that was requested
    pub url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value
    pub content_type: Option<String>,
    /// Decoded response body
    pub body: String,
}

/// Trait for page fetchers
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Unique identifier for this fetcher (for logging/debugging)
    fn name(&self) -> &'static str;

    /// Fetch the page at `url`
    ///
    /// Called after the URL passed scheme and prefix validation.
    /// Non-success statuses are errors.
    async fn fetch(&self, url: &Url, options: &FetchOptions) -> Result<FetchedPage, FetchError>;
}
