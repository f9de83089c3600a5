// src/crawl/worker.rs
// =============================================================================
// A crawl worker expands a single page.
//
// Steps:
// 1. Ask the fetcher for the page's links (failure = the page is a leaf)
// 2. Claim each link in the shared visited set; skip links someone else has
// 3. Look up titles for the claimed links
// 4. Return them as child nodes one level deeper, in markup order
//
// The worker never waits on other workers and never touches the tree. The
// orchestrator attaches the children it returns.
//
// When the crawl has a concurrency gate, every network call (the link fetch
// and each title lookup) takes its own permit. Permits are never nested, so
// even a gate of one can't deadlock.
// =============================================================================

use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::debug;

use super::node::PageNode;
use super::visited::VisitedSet;
use crate::error::FetchError;
use crate::page::{PageFetcher, TitleResolver};

#[derive(Clone)]
pub struct Worker {
    fetcher: Arc<dyn PageFetcher>,
    titles: Arc<dyn TitleResolver>,
}

impl Worker {
    pub fn new(fetcher: Arc<dyn PageFetcher>, titles: Arc<dyn TitleResolver>) -> Self {
        Self { fetcher, titles }
    }

    pub fn titles(&self) -> &dyn TitleResolver {
        self.titles.as_ref()
    }

    /// Expands the page at `url`, which sits at `depth`.
    ///
    /// Returns its newly discovered children at `depth + 1`, each with empty
    /// children of its own.
    pub async fn run(
        &self,
        url: &str,
        depth: usize,
        visited: &VisitedSet,
        gate: Option<&Semaphore>,
    ) -> Result<Vec<PageNode>, FetchError> {
        let links = gated(gate, self.fetcher.fetch_links(url)).await?;
        let found = links.len();

        // try_mark is the only dedup step: whoever claims a link first owns it
        let claimed: Vec<String> = links
            .into_iter()
            .filter(|link| visited.try_mark(link))
            .collect();

        debug!(%url, depth, found, claimed = claimed.len(), "expanded page");

        // join_all keeps the input order, so titles line up with links
        let titles = join_all(
            claimed
                .iter()
                .map(|link| gated(gate, self.titles.title(link))),
        )
        .await;

        Ok(claimed
            .into_iter()
            .zip(titles)
            .map(|(link, title)| PageNode::new(link, title, depth + 1))
            .collect())
    }
}

/// Runs `request` while holding a permit from `gate`, if there is one.
/// A closed semaphore just means no limit.
pub async fn gated<F: Future>(gate: Option<&Semaphore>, request: F) -> F::Output {
    let _permit = match gate {
        Some(gate) => gate.acquire().await.ok(),
        None => None,
    };
    request.await
}
