// src/crawl/orchestrator.rs
// =============================================================================
// This module runs a crawl: it fans out one task per page and assembles the
// results into a tree.
//
// How it works:
// 1. Validate the seed URL and depth (the only errors a crawl can return)
// 2. Create the root node, mark the seed as visited
// 3. Spawn a worker for every node shallower than max_depth
// 4. Each worker posts its children back over a channel when it finishes
// 5. For every report: in_flight -= 1, attach the children, then spawn a
//    worker (in_flight += 1) for each child that is still above the cutoff
// 6. When in_flight hits zero there is nothing left to wait for: done
//
// There is no worker pool. The number of tasks grows and shrinks with the
// site. An optional semaphore caps how many requests (link fetches and title
// lookups together) are in progress at once.
//
// Only this loop touches `in_flight` and the tree, so neither needs a lock.
// The visited set is the only state shared between tasks.
// =============================================================================

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt; // catch_unwind()
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};
use url::Url;

use super::node::PageNode;
use super::tree::{NodeIndex, TreeBuilder};
use super::visited::VisitedSet;
use super::worker::{gated, Worker};
use crate::error::{CrawlError, FetchError};
use crate::page::{is_crawlable, normalize_url, PageFetcher, TitleResolver};

// A page waiting to be expanded
struct Task {
    index: NodeIndex,
    url: String,
    depth: usize,
}

// What a finished worker posts back. Failed pages report no children.
struct Report {
    parent: NodeIndex,
    children: Vec<PageNode>,
}

// Per-crawl state shared with every spawned task
struct Shared {
    visited: Arc<VisitedSet>,
    gate: Option<Arc<Semaphore>>,
    reports: UnboundedSender<Report>,
}

pub struct Crawler {
    worker: Worker,
    max_concurrency: Option<usize>,
}

impl Crawler {
    pub fn new(fetcher: Arc<dyn PageFetcher>, titles: Arc<dyn TitleResolver>) -> Self {
        Self {
            worker: Worker::new(fetcher, titles),
            max_concurrency: None,
        }
    }

    /// Caps the number of page requests in progress at the same time
    pub fn with_max_concurrency(mut self, limit: Option<usize>) -> Self {
        self.max_concurrency = limit;
        self
    }

    /// Crawls from `seed_url`, expanding pages shallower than `max_depth`.
    ///
    /// Pages at exactly `max_depth` appear in the tree as leaves; `max_depth`
    /// of 0 returns just the root. Page failures never fail the crawl, they
    /// only make the tree shallower.
    pub async fn crawl(&self, seed_url: &str, max_depth: i64) -> Result<PageNode, CrawlError> {
        let seed = validate_seed(seed_url)?;
        let max_depth =
            usize::try_from(max_depth).map_err(|_| CrawlError::InvalidDepth(max_depth))?;

        info!(seed = %seed, max_depth, "starting crawl");

        let visited = Arc::new(VisitedSet::new());
        visited.try_mark(&seed);

        let gate = self.max_concurrency.map(|n| Arc::new(Semaphore::new(n)));

        let title = gated(gate.as_deref(), self.worker.titles().title(&seed)).await;
        let mut tree = TreeBuilder::new(PageNode::new(seed.clone(), title, 0));

        let (reports, mut inbox) = mpsc::unbounded_channel();
        let shared = Shared {
            visited,
            gate,
            reports,
        };

        let mut in_flight: usize = 0;
        if max_depth > 0 {
            in_flight += 1;
            self.launch(
                Task {
                    index: TreeBuilder::ROOT,
                    url: seed.clone(),
                    depth: 0,
                },
                &shared,
            );
        }

        while in_flight > 0 {
            // We hold a sender ourselves, so the channel can't close under us
            let Some(report) = inbox.recv().await else {
                break;
            };
            in_flight -= 1;

            for child in report.children {
                let (url, depth) = (child.url.clone(), child.depth);
                let index = tree.attach(report.parent, child);

                if depth < max_depth {
                    in_flight += 1;
                    self.launch(Task { index, url, depth }, &shared);
                }
            }

            debug!(in_flight, pages = tree.len(), "report received");
        }

        info!(
            seed = %seed,
            pages = tree.len(),
            visited = shared.visited.len(),
            "crawl finished"
        );

        Ok(tree.into_root())
    }

    /// Runs [`crawl`](Self::crawl) with an optional overall deadline.
    ///
    /// On expiry the crawl is abandoned: workers still running find the
    /// report channel closed and finish on their own.
    pub async fn crawl_with_deadline(
        &self,
        seed_url: &str,
        max_depth: i64,
        deadline: Option<Duration>,
    ) -> Result<PageNode, CrawlError> {
        match deadline {
            None => self.crawl(seed_url, max_depth).await,
            Some(limit) => tokio::time::timeout(limit, self.crawl(seed_url, max_depth))
                .await
                .map_err(|_| CrawlError::DeadlineExceeded(limit))?,
        }
    }

    // Spawns a worker task for one page. The task always posts exactly one
    // report, even if the fetch fails or the worker panics, so in_flight
    // always gets back to zero.
    fn launch(&self, task: Task, shared: &Shared) {
        let worker = self.worker.clone();
        let visited = Arc::clone(&shared.visited);
        let gate = shared.gate.clone();
        let reports = shared.reports.clone();

        tokio::spawn(async move {
            let outcome = AssertUnwindSafe(worker.run(
                &task.url,
                task.depth,
                &visited,
                gate.as_deref(),
            ))
            .catch_unwind()
            .await;

            let children = match outcome {
                Ok(Ok(children)) => children,
                Ok(Err(e)) => {
                    warn!(url = %task.url, "keeping page as a leaf: {e}");
                    Vec::new()
                }
                Err(_) => {
                    let e = FetchError::WorkerPanicked(task.url.clone());
                    warn!(url = %task.url, "keeping page as a leaf: {e}");
                    Vec::new()
                }
            };

            // Only fails if the caller abandoned the crawl
            let _ = reports.send(Report {
                parent: task.index,
                children,
            });
        });
    }
}

// Checks the seed is an absolute http(s) URL with a host, and returns it in
// the same normalized form the fetcher gives links, so back-links to the seed
// hit the visited set.
fn validate_seed(seed_url: &str) -> Result<String, CrawlError> {
    let invalid = |reason: &str| CrawlError::InvalidSeed {
        url: seed_url.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(seed_url.trim()).map_err(|e| invalid(&e.to_string()))?;

    if !is_crawlable(&url) {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("URL has no host"));
    }

    Ok(normalize_url(url).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::fixture::StaticSite;

    const SEED: &str = "https://example.test/";
    const A: &str = "https://example.test/a";
    const B: &str = "https://example.test/b";
    const C: &str = "https://example.test/c";

    fn crawler(site: &Arc<StaticSite>) -> Crawler {
        Crawler::new(site.clone(), site.clone())
    }

    fn assert_depths_consistent(node: &PageNode) {
        for child in &node.children {
            assert_eq!(child.depth, node.depth + 1, "bad depth under {}", node.url);
            assert_depths_consistent(child);
        }
    }

    #[tokio::test]
    async fn test_three_children_scenario() {
        let site = Arc::new(
            StaticSite::new()
                .page(SEED, &[A, B, C])
                .title(SEED, "Home"),
        );

        let root = crawler(&site).crawl("https://example.test", 2).await.unwrap();

        assert_eq!(root.depth, 0);
        assert_eq!(root.title, "Home");
        assert_eq!(root.url, SEED);
        assert_eq!(
            root.children,
            vec![
                PageNode::new(A, "", 1),
                PageNode::new(B, "", 1),
                PageNode::new(C, "", 1),
            ]
        );
    }

    #[tokio::test]
    async fn test_depth_zero_never_fetches() {
        let site = Arc::new(StaticSite::new().page(SEED, &[A, B]));

        let root = crawler(&site).crawl(SEED, 0).await.unwrap();

        assert!(root.is_leaf());
        assert!(site.fetched().is_empty());
    }

    #[tokio::test]
    async fn test_nodes_at_max_depth_are_leaves() {
        let site = Arc::new(
            StaticSite::new()
                .page(SEED, &[A])
                .page(A, &[B])
                .page(B, &[C]),
        );

        let root = crawler(&site).crawl(SEED, 2).await.unwrap();

        assert_eq!(root.max_depth(), 2);
        let b = &root.children[0].children[0];
        assert_eq!(b.url, B);
        assert!(b.is_leaf());
        assert!(!site.fetched().contains(&B.to_string()));
        assert_depths_consistent(&root);
    }

    #[tokio::test]
    async fn test_back_link_to_seed_dropped() {
        let site = Arc::new(StaticSite::new().page(SEED, &[A]).page(A, &[SEED]));

        let root = crawler(&site).crawl(SEED, 5).await.unwrap();

        assert_eq!(root.children.len(), 1);
        assert!(root.children[0].is_leaf());
    }

    #[tokio::test]
    async fn test_seed_fetch_failure_returns_bare_root() {
        let site = Arc::new(StaticSite::new().page(SEED, &[A]).failing(SEED));

        let root = crawler(&site).crawl(SEED, 3).await.unwrap();

        assert_eq!(root.url, SEED);
        assert!(root.is_leaf());
    }

    #[tokio::test]
    async fn test_failed_page_becomes_leaf_without_affecting_siblings() {
        let site = Arc::new(
            StaticSite::new()
                .page(SEED, &[A, B])
                .page(A, &["https://example.test/a/1"])
                .page(B, &["https://example.test/b/1"])
                .failing(A),
        );

        let root = crawler(&site).crawl(SEED, 3).await.unwrap();

        assert_eq!(root.children.len(), 2);
        assert!(root.children[0].is_leaf());
        assert_eq!(root.children[1].children[0].url, "https://example.test/b/1");
    }

    #[tokio::test]
    async fn test_panicking_worker_does_not_hang_crawl() {
        let site = Arc::new(
            StaticSite::new()
                .page(SEED, &[A, B])
                .page(B, &[C])
                .panicking(A),
        );

        let root = crawler(&site).crawl(SEED, 3).await.unwrap();

        assert!(root.children[0].is_leaf());
        assert_eq!(root.children[1].children[0].url, C);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_shared_link_claimed_exactly_once() {
        const X: &str = "https://example.test/x";
        const Y: &str = "https://example.test/y";
        const Z: &str = "https://example.test/z";

        for _ in 0..20 {
            let site = Arc::new(
                StaticSite::new()
                    .page(SEED, &[X, Y])
                    .page(X, &[Z])
                    .page(Y, &[Z]),
            );

            let root = crawler(&site).crawl(SEED, 3).await.unwrap();

            let zs: Vec<_> = root.iter().filter(|n| n.url == Z).collect();
            assert_eq!(zs.len(), 1);
            assert_eq!(zs[0].depth, 2);
        }
    }

    #[tokio::test]
    async fn test_no_url_appears_twice() {
        let site = Arc::new(
            StaticSite::new()
                .page(SEED, &[A, B, C])
                .page(A, &[B, C, SEED])
                .page(B, &[A, C])
                .page(C, &[A, B, "https://example.test/d"]),
        );

        let root = crawler(&site).crawl(SEED, 4).await.unwrap();

        let mut urls: Vec<_> = root.iter().map(|n| n.url.clone()).collect();
        let total = urls.len();
        urls.sort();
        urls.dedup();
        assert_eq!(urls.len(), total);
        assert_eq!(total, 5);
        assert_depths_consistent(&root);
    }

    #[tokio::test]
    async fn test_concurrency_gate_caps_parallel_fetches() {
        let links: Vec<String> = (0..10).map(|i| format!("https://example.test/p{i}")).collect();
        let link_refs: Vec<&str> = links.iter().map(String::as_str).collect();
        let site = Arc::new(
            StaticSite::new()
                .page(SEED, &link_refs)
                .with_delay(Duration::from_millis(20)),
        );

        let root = crawler(&site)
            .with_max_concurrency(Some(2))
            .crawl(SEED, 2)
            .await
            .unwrap();

        assert_eq!(root.children.len(), 10);
        assert_eq!(site.fetched().len(), 11);
        // Covers the ten title lookups fanned out by the seed's worker too
        assert!(site.peak_concurrency() <= 2);
    }

    #[tokio::test]
    async fn test_single_permit_gate_completes() {
        let site = Arc::new(
            StaticSite::new()
                .page(SEED, &[A, B, C])
                .page(A, &["https://example.test/a/1", "https://example.test/a/2"])
                .with_delay(Duration::from_millis(1)),
        );

        let root = crawler(&site)
            .with_max_concurrency(Some(1))
            .crawl(SEED, 3)
            .await
            .unwrap();

        assert_eq!(root.node_count(), 6);
        assert_eq!(site.peak_concurrency(), 1);
    }

    #[tokio::test]
    async fn test_invalid_seed_rejected() {
        let site = Arc::new(StaticSite::new());
        let crawler = crawler(&site);

        for seed in ["not a url", "ftp://example.test/", "mailto:me@example.test", "/relative"] {
            let err = crawler.crawl(seed, 1).await.unwrap_err();
            assert!(matches!(err, CrawlError::InvalidSeed { .. }), "{seed}");
        }
        assert!(site.fetched().is_empty());
    }

    #[tokio::test]
    async fn test_negative_depth_rejected() {
        let site = Arc::new(StaticSite::new());

        let err = crawler(&site).crawl(SEED, -1).await.unwrap_err();

        assert!(matches!(err, CrawlError::InvalidDepth(-1)));
        assert!(site.fetched().is_empty());
    }

    #[tokio::test]
    async fn test_deadline_exceeded() {
        let site = Arc::new(
            StaticSite::new()
                .page(SEED, &[A])
                .with_delay(Duration::from_secs(5)),
        );

        let err = crawler(&site)
            .crawl_with_deadline(SEED, 2, Some(Duration::from_millis(50)))
            .await
            .unwrap_err();

        assert!(matches!(err, CrawlError::DeadlineExceeded(_)));
    }

    #[test]
    fn test_seed_normalized() {
        assert_eq!(
            validate_seed("HTTPS://Example.TEST//a#top").unwrap(),
            "https://example.test/a"
        );
    }
}
