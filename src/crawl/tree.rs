// src/crawl/tree.rs
// =============================================================================
// Builds the result tree while the crawl is running.
//
// Workers report children for a parent while other workers are still
// running, so we can't hand out `&mut` references into a nested PageNode
// tree. Instead the orchestrator keeps a flat arena:
//   nodes[i]    = the page itself (children left empty)
//   children[i] = arena indices of its children, in report order
//
// A worker is told its node's index, and reports back with it. When the crawl
// finishes, `into_root` folds the arena into a nested PageNode.
// =============================================================================

use super::node::PageNode;

/// Arena index of a node in a [`TreeBuilder`]
pub type NodeIndex = usize;

pub struct TreeBuilder {
    nodes: Vec<PageNode>,
    children: Vec<Vec<NodeIndex>>,
}

impl TreeBuilder {
    pub const ROOT: NodeIndex = 0;

    pub fn new(root: PageNode) -> Self {
        Self {
            nodes: vec![root],
            children: vec![Vec::new()],
        }
    }

    /// Appends `child` under `parent` and returns the child's index
    pub fn attach(&mut self, parent: NodeIndex, mut child: PageNode) -> NodeIndex {
        let index = self.nodes.len();
        child.children.clear();
        self.nodes.push(child);
        self.children.push(Vec::new());
        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.push(index);
        }
        index
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Folds the arena into the nested tree.
    ///
    /// A child is always attached after its parent, so it has a larger index.
    /// Walking indices from the back means every node's children are already
    /// complete by the time we move them into it.
    pub fn into_root(self) -> PageNode {
        let mut slots: Vec<Option<PageNode>> = self.nodes.into_iter().map(Some).collect();

        for (index, kids) in self.children.iter().enumerate().rev() {
            let attached: Vec<PageNode> = kids
                .iter()
                .filter_map(|&kid| slots.get_mut(kid).and_then(Option::take))
                .collect();
            if let Some(Some(node)) = slots.get_mut(index) {
                node.children = attached;
            }
        }

        slots.into_iter().next().flatten().unwrap_or_default()
    }
}
