// src/core/include_graph/tree_builder.rs
use tracing::{debug, warn};

use super::{IncludeGraph, IncludeNode, NodeId, TraceEntry};

/// Rebuilds the inclusion tree from depth-annotated trace entries.
///
/// The stack holds the currently open chain of includes. An entry at depth
/// `d` closes every open node at depth `>= d` (equal depth means sibling)
/// and becomes a child of whatever is left on top.
pub struct TreeBuilder {
    nodes: Vec<IncludeNode>,
    stack: Vec<NodeId>,
    orphans: usize,
}

impl TreeBuilder {
    /// Start a tree rooted at the translation unit `root_path` (depth 0)
    pub fn new(root_path: impl Into<String>) -> Self {
        let root = IncludeNode::new(NodeId(0), 0, root_path.into());
        Self {
            nodes: vec![root],
            stack: vec![NodeId(0)],
            orphans: 0,
        }
    }

    /// Build a complete graph in one go
    pub fn build<I>(root_path: impl Into<String>, entries: I) -> IncludeGraph
    where
        I: IntoIterator<Item = TraceEntry>,
    {
        let mut builder = Self::new(root_path);
        for entry in entries {
            builder.push(entry);
        }
        builder.finish()
    }

    /// Register the next entry of the trace and attach it to its includer
    pub fn push(&mut self, entry: TraceEntry) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut node = IncludeNode::new(id, entry.depth, entry.path);

        while let Some(top) = self.stack.last() {
            if self.nodes[top.0].depth >= node.depth {
                self.stack.pop();
            } else {
                break;
            }
        }

        match self.stack.last().copied() {
            Some(parent_id) => {
                let parent = &mut self.nodes[parent_id.0];
                if node.depth > parent.depth + 1 {
                    debug!(
                        "Depth jumps from {} to {} at {}; attaching to {}",
                        parent.depth, node.depth, node.full_path, parent.name
                    );
                }
                parent.children.push(id);
                node.parent = Some(parent_id);
            }
            None => {
                self.orphans += 1;
                warn!(
                    "Include {} at depth {} has no open parent, keeping it as an extra root",
                    node.full_path, node.depth
                );
            }
        }

        self.stack.push(id);
        self.nodes.push(node);
        id
    }

    /// Number of entries that could not be attached so far
    pub fn orphan_count(&self) -> usize {
        self.orphans
    }

    pub fn finish(self) -> IncludeGraph {
        debug!(
            "Built include tree with {} nodes ({} orphaned)",
            self.nodes.len(),
            self.orphans
        );
        IncludeGraph::from_nodes(self.nodes)
    }
}
