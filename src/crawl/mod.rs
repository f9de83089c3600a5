// src/crawl/mod.rs
// =============================================================================
// This module is the concurrent crawl engine.
//
// Features:
// - One async task per page, no fixed worker pool
// - Global dedup through a shared, atomic visited set
// - Exclusive depth cutoff (pages at max depth are leaves)
// - Per-page failures turn pages into leaves instead of failing the crawl
// - Optional cap on concurrent fetches
//
// Submodules:
// - node: the PageNode result tree
// - visited: the shared visited set
// - worker: expands one page into its children
// - tree: arena used to assemble the tree while tasks report
// - orchestrator: spawns workers, counts them, and decides when we're done
// =============================================================================

mod node;
mod orchestrator;
mod tree;
mod visited;
mod worker;

pub use node::PageNode;
pub use orchestrator::Crawler;
