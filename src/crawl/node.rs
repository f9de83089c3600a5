// src/crawl/node.rs
// =============================================================================
// The result of a crawl: a tree of pages rooted at the seed URL.
//
// Serialized shape (what the HTTP API and `--json` print):
//   { "depth": 0, "title": "...", "url": "...", "nodes": [ ...children... ] }
//
// `nodes` is always an array, never null, so leaves print as "nodes": [].
// =============================================================================

use serde::{Deserialize, Serialize};

/// One crawled (or queued) page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageNode {
    /// Distance from the seed page, which is 0
    pub depth: usize,
    /// Page title, or empty when it couldn't be resolved
    pub title: String,
    /// Normalized absolute URL; a page's identity within one crawl
    pub url: String,
    /// Pages first discovered from this one, in markup order
    #[serde(rename = "nodes", default)]
    pub children: Vec<PageNode>,
}

impl PageNode {
    /// Creates a node with no children
    pub fn new(url: impl Into<String>, title: impl Into<String>, depth: usize) -> Self {
        Self {
            depth,
            title: title.into(),
            url: url.into(),
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including this one
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Depth of the deepest node in this subtree
    pub fn max_depth(&self) -> usize {
        self.iter().map(|node| node.depth).max().unwrap_or(self.depth)
    }

    /// Walks the subtree in pre-order (a node, then its children in order)
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }
}

/// Pre-order iterator over a [`PageNode`] subtree
pub struct Iter<'a> {
    stack: Vec<&'a PageNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a PageNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Reversed so the first child is popped next
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
