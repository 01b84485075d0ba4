//! Relay builder and fetch-then-rewrite pipeline

use crate::client::{validate_url, FetchOptions};
use crate::error::FetchError;
use crate::fetchers::{Fetcher, HttpFetcher};
use crate::rewrite::{Rewriter, SubstitutionTable};
use crate::types::RelayResponse;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Builder for configuring a [`Relay`]
#[derive(Clone, Default)]
pub struct RelayBuilder {
    options: FetchOptions,
    table: SubstitutionTable,
    fetcher: Option<Arc<dyn Fetcher>>,
}

impl RelayBuilder {
    /// Create a new builder with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom User-Agent
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.options.user_agent = Some(ua.into());
        self
    }

    /// Set the upstream request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Set the maximum accepted body size
    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.options.max_body_bytes = limit;
        self
    }

    /// Add URL prefix to allow list
    pub fn allow_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options.allow_prefixes.push(prefix.into());
        self
    }

    /// Add URL prefix to block list
    pub fn block_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options.block_prefixes.push(prefix.into());
        self
    }

    /// Replace the substitution table
    pub fn substitutions(mut self, table: SubstitutionTable) -> Self {
        self.table = table;
        self
    }

    /// Use a custom fetcher instead of [`HttpFetcher`]
    pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Build the relay
    pub fn build(self) -> Relay {
        Relay {
            fetcher: self.fetcher.unwrap_or_else(|| Arc::new(HttpFetcher::new())),
            rewriter: Rewriter::new(self.table),
            options: self.options,
        }
    }
}

impl fmt::Debug for RelayBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayBuilder")
            .field("options", &self.options)
            .field("table", &self.table)
            .field("fetcher", &self.fetcher.as_ref().map(|fetcher| fetcher.name()))
            .finish()
    }
}

/// Configured relay: fetches a page and rewrites it
#[derive(Clone)]
pub struct Relay {
    fetcher: Arc<dyn Fetcher>,
    rewriter: Rewriter,
    options: FetchOptions,
}

impl Default for Relay {
    fn default() -> Self {
        RelayBuilder::new().build()
    }
}

impl fmt::Debug for Relay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relay")
            .field("fetcher", &self.fetcher.name())
            .field("rewriter", &self.rewriter)
            .field("options", &self.options)
            .finish()
    }
}

impl Relay {
    /// Create a new relay builder
    pub fn builder() -> RelayBuilder {
        RelayBuilder::new()
    }

    /// Fetch options in effect
    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// The rewriter applied to fetched pages
    pub fn rewriter(&self) -> &Rewriter {
        &self.rewriter
    }

    /// Fetch `url`, rewrite the page and report the result
    pub async fn execute(&self, url: &str) -> Result<RelayResponse, FetchError> {
        let parsed = validate_url(url, &self.options)?;

        debug!(fetcher = self.fetcher.name(), url = %parsed, "Fetching page");
        let page = self.fetcher.fetch(&parsed, &self.options).await?;

        let result = self.rewriter.rewrite(&page.body);
        info!(
            url = %url,
            status = page.status_code,
            replacements = result.replacement_count,
            "Rewrote page"
        );

        Ok(RelayResponse {
            success: true,
            content: result.html,
            title: result.title,
            original_url: url.to_string(),
            replacement_count: result.replacement_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetchers::FetchedPage;
    use async_trait::async_trait;
    use url::Url;

    struct StaticFetcher(&'static str);

    #[async_trait]
    impl Fetcher for StaticFetcher {
        fn name(&self) -> &'static str {
            "static"
        }

        async fn fetch(
            &self,
            url: &Url,
            _options: &FetchOptions,
        ) -> Result<FetchedPage, FetchError> {
            Ok(FetchedPage {
                url: url.to_string(),
                status_code: 200,
                content_type: Some("text/html".to_string()),
                body: self.0.to_string(),
            })
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl Fetcher for FailingFetcher {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn fetch(
            &self,
            _url: &Url,
            _options: &FetchOptions,
        ) -> Result<FetchedPage, FetchError> {
            Err(FetchError::RequestError("dns error".to_string()))
        }
    }

    #[test]
    fn test_relay_builder() {
        let relay = Relay::builder()
            .user_agent("TestAgent/1.0")
            .timeout(Duration::from_secs(5))
            .max_body_bytes(1024)
            .allow_prefix("https://allowed.com")
            .block_prefix("https://blocked.com")
            .build();

        assert_eq!(relay.options.user_agent, Some("TestAgent/1.0".to_string()));
        assert_eq!(relay.options.timeout, Duration::from_secs(5));
        assert_eq!(relay.options.max_body_bytes, 1024);
        assert_eq!(relay.options.allow_prefixes, vec!["https://allowed.com"]);
        assert_eq!(relay.options.block_prefixes, vec!["https://blocked.com"]);
        assert_eq!(relay.fetcher.name(), "http");
    }

    #[tokio::test]
    async fn test_execute_rewrites_page() {
        let relay = Relay::builder()
            .fetcher(Arc::new(StaticFetcher(
                "<title>Yale</title><p>YALE and yale</p>",
            )))
            .build();

        let resp = relay.execute("https://example.com/").await.unwrap();

        assert!(resp.success);
        assert_eq!(resp.title, "Fale");
        assert_eq!(resp.original_url, "https://example.com/");
        assert_eq!(resp.replacement_count, 3);
        assert!(resp.content.contains("<p>FALE and fale</p>"));
    }

    #[tokio::test]
    async fn test_execute_keeps_original_url_verbatim() {
        let relay = Relay::builder()
            .fetcher(Arc::new(StaticFetcher("<p>hi</p>")))
            .build();

        let resp = relay.execute("https://EXAMPLE.com").await.unwrap();
        assert_eq!(resp.original_url, "https://EXAMPLE.com");
    }

    #[tokio::test]
    async fn test_execute_with_custom_table() {
        let relay = Relay::builder()
            .fetcher(Arc::new(StaticFetcher("<p>Yale and Harvard</p>")))
            .substitutions(SubstitutionTable::case_variants("harvard", "barvard"))
            .build();

        let resp = relay.execute("https://example.com/").await.unwrap();
        assert!(resp.content.contains("<p>Yale and Barvard</p>"));
        assert_eq!(resp.replacement_count, 1);
    }

    #[tokio::test]
    async fn test_execute_propagates_fetch_error() {
        let relay = Relay::builder().fetcher(Arc::new(FailingFetcher)).build();

        let err = relay.execute("https://example.com/").await.unwrap_err();
        assert_eq!(err.to_string(), "Request failed: dns error");
    }

    #[tokio::test]
    async fn test_execute_validates_before_fetching() {
        let relay = Relay::builder()
            .fetcher(Arc::new(FailingFetcher))
            .block_prefix("https://blocked.com")
            .build();

        assert!(matches!(
            relay.execute("").await,
            Err(FetchError::MissingUrl)
        ));
        assert!(matches!(
            relay.execute("https://blocked.com/page").await,
            Err(FetchError::BlockedUrl)
        ));
    }
}
