// src/crawl/visited.rs
// =============================================================================
// The set of URLs already scheduled in one crawl.
//
// Every worker runs concurrently and may discover the same link at the same
// time. Checking "have we seen this?" and then inserting as two steps would
// let both workers claim it. So the set only exposes `try_mark`, which does
// the check and the insert as one operation.
//
// DashSet is a sharded concurrent set: `insert` locks the shard that owns the
// key, inserts if absent, and tells us whether it did. No global lock, and
// no way for two callers to both get `true` for the same URL.
// =============================================================================

use dashmap::DashSet;

#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: DashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `url` as visited.
    ///
    /// Returns `true` if this call claimed the URL, `false` if it was already
    /// claimed (by this or any other worker).
    pub fn try_mark(&self, url: &str) -> bool {
        self.urls.insert(url.to_owned())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
