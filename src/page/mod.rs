// src/page/mod.rs
// =============================================================================
// This module is everything the crawler knows about individual pages.
//
// The crawl engine only ever asks two questions about a page:
// - "Which links are on this page?"  (PageFetcher)
// - "What is this page called?"      (TitleResolver)
//
// Both are traits so tests can swap in a deterministic in-memory site instead
// of hitting the network. The real implementation lives in http.rs.
//
// Submodules:
// - http: reqwest-backed implementation of both traits
// - links: href extraction and URL normalization
// - title: <title> extraction
// =============================================================================

mod http;
mod links;
mod title;

#[cfg(test)]
pub mod fixture;

use async_trait::async_trait;

use crate::error::FetchError;

pub use http::HttpPageSource;
pub use links::{is_crawlable, normalize_url};

/// Finds the outbound links of a page
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns normalized absolute http(s) links in markup order, or fails
    /// when the page cannot be retrieved or parsed.
    async fn fetch_links(&self, url: &str) -> Result<Vec<String>, FetchError>;
}

/// Finds a best-effort title for a page
#[async_trait]
pub trait TitleResolver: Send + Sync {
    /// Never fails outward: returns an empty string when no title is found.
    async fn title(&self, url: &str) -> String;
}
