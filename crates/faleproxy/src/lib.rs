//! Faleproxy - fetch a web page and rewrite its visible text
//!
//! The relay fetches a page, replaces `Yale`/`YALE`/`yale` with
//! `Fale`/`FALE`/`fale` in text content, and leaves markup alone: tag names,
//! attribute values such as `href`, `src` and `alt`, comments and script
//! bodies come out exactly as they went in.
//!
//! ## Components
//!
//! - [`Rewriter`] - parses HTML and rewrites text nodes using a
//!   [`SubstitutionTable`]
//! - [`Fetcher`] - pluggable page fetcher; [`HttpFetcher`] is the default
//! - [`Relay`] - fetch-then-rewrite pipeline, configured via [`RelayBuilder`]
//! - [`server`] - axum router exposing `POST /fetch`
//!
//! ```no_run
//! # async fn run() -> Result<(), faleproxy::FetchError> {
//! let relay = faleproxy::Relay::builder().user_agent("MyBot/1.0").build();
//! let response = relay.execute("https://example.com/").await?;
//! println!("{} replacements", response.replacement_count);
//! # Ok(())
//! # }
//! ```

pub mod client;
mod error;
pub mod fetchers;
mod relay;
pub mod rewrite;
pub mod server;
mod types;

pub use client::{fetch_page, rewrite_url, validate_url, FetchOptions};
pub use error::FetchError;
pub use fetchers::{FetchedPage, Fetcher, HttpFetcher};
pub use relay::{Relay, RelayBuilder};
pub use rewrite::{RewriteResult, Rewriter, SubstitutionTable};
pub use server::{ServerConfig, DEFAULT_PORT};
pub use types::{ErrorResponse, RelayRequest, RelayResponse};

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str = "Everruns Faleproxy/1.0";
