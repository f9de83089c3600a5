// src/page/fixture.rs
// In-memory site used by the crawl and server tests in place of the network.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use super::{PageFetcher, TitleResolver};
use crate::error::FetchError;

#[derive(Default)]
pub struct StaticSite {
    pages: HashMap<String, Vec<String>>,
    titles: HashMap<String, String>,
    failing: HashSet<String>,
    panicking: HashSet<String>,
    delay: Option<Duration>,
    active: AtomicUsize,
    peak: AtomicUsize,
    fetched: Mutex<Vec<String>>,
}

impl StaticSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the links found on `url`. Unknown pages have no links.
    pub fn page(mut self, url: &str, links: &[&str]) -> Self {
        self.pages
            .insert(url.to_string(), links.iter().map(|l| l.to_string()).collect());
        self
    }

    pub fn title(mut self, url: &str, title: &str) -> Self {
        self.titles.insert(url.to_string(), title.to_string());
        self
    }

    /// Fetching `url` answers with HTTP 500
    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    /// Fetching `url` panics inside the worker
    pub fn panicking(mut self, url: &str) -> Self {
        self.panicking.insert(url.to_string());
        self
    }

    /// Every fetch and title lookup sleeps for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// URLs passed to `fetch_links`, in call order
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    /// Highest number of requests (link fetches and title lookups) that were
    /// in progress at the same time
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    async fn simulate_request(&self) {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl PageFetcher for StaticSite {
    async fn fetch_links(&self, url: &str) -> Result<Vec<String>, FetchError> {
        if self.panicking.contains(url) {
            panic!("fixture asked to panic on {url}");
        }

        self.fetched.lock().unwrap().push(url.to_string());
        self.simulate_request().await;

        if self.failing.contains(url) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: StatusCode::INTERNAL_SERVER_ERROR,
            });
        }

        Ok(self.pages.get(url).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl TitleResolver for StaticSite {
    async fn title(&self, url: &str) -> String {
        self.simulate_request().await;
        self.titles.get(url).cloned().unwrap_or_default()
    }
}
