// src/error.rs
// =============================================================================
// Error types for the crawler.
//
// There are two kinds of failure:
// - Upfront validation (bad seed URL, negative depth). These reject the whole
//   crawl before any task is spawned. A caller-imposed deadline is reported
//   the same way.
// - Per-page failures (fetch, title, unparseable link). These are recovered
//   where they happen: the page simply becomes a leaf, the title is empty, or
//   the link is dropped.
//
// We use `thiserror` to derive Display/Error for these enums. The application
// layer (main.rs, server.rs) wraps them in `anyhow` where extra context helps.
// =============================================================================

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that abort a crawl before it starts
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Seed URL is missing, unparseable, has no host, or is not http/https
    #[error("invalid seed URL '{url}': {reason}")]
    InvalidSeed { url: String, reason: String },

    /// Requested depth is negative
    #[error("invalid depth {0}: depth must be zero or greater")]
    InvalidDepth(i64),

    /// The caller's overall deadline expired; the crawl was abandoned
    #[error("crawl did not finish within {0:?}")]
    DeadlineExceeded(std::time::Duration),
}

/// A page could not be retrieved or parsed (the `FetchFailed` condition)
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network error, timeout, or body read failure
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },

    /// The URL handed to the fetcher was not a valid absolute URL
    #[error("cannot fetch {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The worker task panicked before it could report
    #[error("worker for {0} panicked")]
    WorkerPanicked(String),
}

/// A discovered href could not be turned into a crawlable URL
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkError {
    #[error("unparseable link '{href}': {source}")]
    Unparseable {
        href: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported scheme '{0}'")]
    UnsupportedScheme(String),
}
