// src/page/http.rs
// =============================================================================
// The real page source: fetches pages over HTTP with reqwest.
//
// `HttpPageSource` implements both capabilities the crawler needs:
// - PageFetcher: GET the page, extract and normalize its links
// - TitleResolver: GET the page, read its <title>
//
// One reqwest Client is shared by every worker. Client is cheap to clone
// (it's a reference counter internally) and pools connections per host.
// Each request is bounded by the configured timeout; the crawler itself never
// waits on anything else.
//
// Every non-leaf page is asked for twice: first for its title (when its
// parent discovers it), then for its links (when its own worker runs). The
// title lookup already has the HTML, so it extracts the links too and parks
// them in a small LRU cache; the later link lookup takes them from there
// instead of downloading the page again.
// =============================================================================

use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;
use lru::LruCache;
use parking_lot::Mutex;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::links::extract_links;
use super::title::extract_title;
use super::{PageFetcher, TitleResolver};
use crate::config::CrawlConfig;
use crate::error::FetchError;

// Pages whose links were extracted during a title lookup, waiting for their
// worker. Leaves at the depth cutoff never collect theirs, hence the bound.
const LINK_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1024) {
    Some(capacity) => capacity,
    None => NonZeroUsize::MIN,
};

#[derive(Clone)]
pub struct HttpPageSource {
    client: Client,
    links_cache: Arc<Mutex<LruCache<String, Vec<String>>>>,
}

impl HttpPageSource {
    /// Builds the shared HTTP client from the crawl settings
    pub fn new(config: &CrawlConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            links_cache: Arc::new(Mutex::new(LruCache::new(LINK_CACHE_CAPACITY))),
        })
    }

    // Fetches a web page and returns the URL it was finally served from
    // (after redirects) along with its HTML content
    //
    // Anything other than a 2xx answer is a failure: the page becomes a leaf
    async fn fetch_page(&self, url: &str) -> Result<(Url, String), FetchError> {
        let request_error = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        // Relative links resolve against where we ended up, not where we asked
        let final_url = response.url().clone();
        let html = response.text().await.map_err(request_error)?;

        Ok((final_url, html))
    }
}

#[async_trait]
impl PageFetcher for HttpPageSource {
    async fn fetch_links(&self, url: &str) -> Result<Vec<String>, FetchError> {
        Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let cached = self.links_cache.lock().pop(url);
        if let Some(links) = cached {
            debug!(%url, count = links.len(), "reusing links from title lookup");
            return Ok(links);
        }

        let (final_url, html) = self.fetch_page(url).await?;
        let links = extract_links(&html, &final_url);
        debug!(%url, count = links.len(), "extracted links");

        Ok(links)
    }
}

#[async_trait]
impl TitleResolver for HttpPageSource {
    async fn title(&self, url: &str) -> String {
        match self.fetch_page(url).await {
            Ok((final_url, html)) => {
                let links = extract_links(&html, &final_url);
                self.links_cache.lock().put(url.to_string(), links);
                extract_title(&html).unwrap_or_default()
            }
            Err(e) => {
                debug!(%url, "title unresolved: {e}");
                String::new()
            }
        }
    }
}
