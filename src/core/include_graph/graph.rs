// src/core/include_graph/graph.rs
use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};

/// Index of a node in the graph's registry, equal to its discovery position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One occurrence of a header (or the translation unit) in the trace.
///
/// A header reached through two inclusion paths appears as two nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncludeNode {
    pub id: NodeId,
    /// Nesting level reported by the trace (0 = translation unit)
    pub depth: usize,
    /// Path exactly as emitted by the compiler
    pub full_path: String,
    /// Final path component, used for name matching
    pub name: String,
    /// Including node, `None` for roots
    pub parent: Option<NodeId>,
    /// Directly included nodes, in inclusion order
    pub children: Vec<NodeId>,
}

impl IncludeNode {
    pub(crate) fn new(id: NodeId, depth: usize, full_path: String) -> Self {
        let name = file_name(&full_path).to_string();
        Self {
            id,
            depth,
            full_path,
            name,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Final component of a compiler-reported path. Both separators are accepted
/// since MSVC-style paths can show up in traces produced on Windows.
///
/// A path ending in a separator has no final component; the whole path is
/// used as the name instead of an empty string, so such a node can still be
/// found and printed.
pub fn file_name(path: &str) -> &str {
    match path.rsplit(&['/', '\\'][..]).next() {
        Some(name) if !name.is_empty() => name,
        _ => path,
    }
}

/// Completed inclusion tree: a flat, discovery-ordered registry of nodes
/// linked by parent/child indices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncludeGraph {
    nodes: Vec<IncludeNode>,
}

impl IncludeGraph {
    pub(crate) fn from_nodes(nodes: Vec<IncludeNode>) -> Self {
        Self { nodes }
    }

    /// All nodes in discovery (trace) order
    pub fn nodes(&self) -> &[IncludeNode] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> &IncludeNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&IncludeNode> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &IncludeNode> + '_ {
        self.nodes[id.0].children.iter().map(move |child| &self.nodes[child.0])
    }

    pub fn parent(&self, id: NodeId) -> Option<&IncludeNode> {
        self.nodes[id.0].parent.map(|parent| &self.nodes[parent.0])
    }

    /// Nodes without a parent. Normally just the translation unit; a
    /// malformed trace can leave extra parentless nodes behind.
    pub fn roots(&self) -> Vec<&IncludeNode> {
        self.nodes.iter().filter(|node| node.is_root()).collect()
    }

    /// The first root, i.e. the translation unit the graph was built for
    pub fn root(&self) -> Option<&IncludeNode> {
        self.nodes.first()
    }

    /// Nodes grouped by depth, discovery order preserved inside each level
    pub fn levels(&self) -> BTreeMap<usize, Vec<&IncludeNode>> {
        let mut levels: BTreeMap<usize, Vec<&IncludeNode>> = BTreeMap::new();
        for node in &self.nodes {
            levels.entry(node.depth).or_default().push(node);
        }
        levels
    }

    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|node| node.depth).max().unwrap_or(0)
    }

    /// Walks parent links from `id` up to its root, starting with `id` itself
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            graph: self,
            next: Some(id),
        }
    }

    /// Names from the node's root down to the node
    pub fn path(&self, id: NodeId) -> Vec<&str> {
        let mut names: Vec<&str> = self.ancestors(id).map(|node| node.name.as_str()).collect();
        names.reverse();
        names
    }
}

pub struct Ancestors<'g> {
    graph: &'g IncludeGraph,
    next: Option<NodeId>,
}

impl<'g> Iterator for Ancestors<'g> {
    type Item = &'g IncludeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.graph.get(self.next?)?;
        self.next = node.parent;
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::include_graph::{TraceEntry, TreeBuilder};

    fn sample_graph() -> IncludeGraph {
        let mut builder = TreeBuilder::new("/src/main.cpp");
        for (depth, path) in [(1, "a.h"), (2, "b.h"), (1, "c.h"), (2, "b.h"), (3, "d.h")] {
            builder.push(TraceEntry::new(depth, path).unwrap());
        }
        builder.finish()
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("/usr/include/c++/13/vector"), "vector");
        assert_eq!(file_name("./include/a.h"), "a.h");
        assert_eq!(file_name("C:\\sdk\\include\\windows.h"), "windows.h");
        assert_eq!(file_name("main.cpp"), "main.cpp");
        // Trailing separator: keep the path rather than an empty name
        assert_eq!(file_name("weird/"), "weird/");
        assert_eq!(file_name("C:\\sdk\\"), "C:\\sdk\\");
    }

    #[test]
    fn test_path_lengths_follow_depth() {
        let graph = sample_graph();
        let root_name = graph.root().unwrap().name.clone();

        for node in graph.nodes() {
            let path = graph.path(node.id);
            assert_eq!(path.len(), node.depth + 1, "path for {} was {:?}", node.name, path);
            assert_eq!(path[0], root_name);
            assert_eq!(*path.last().unwrap(), node.name);
        }
    }

    #[test]
    fn test_children_are_one_level_deeper() {
        let graph = sample_graph();
        for node in graph.nodes() {
            for child in graph.children(node.id) {
                assert_eq!(child.depth, node.depth + 1);
                assert_eq!(graph.parent(child.id).map(|p| p.id), Some(node.id));
            }
        }
    }

    #[test]
    fn test_levels_and_roots() {
        let graph = sample_graph();

        let roots = graph.roots();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].name, "main.cpp");

        let levels: Vec<(usize, Vec<String>)> = graph
            .levels()
            .into_iter()
            .map(|(depth, nodes)| (depth, nodes.iter().map(|n| n.name.clone()).collect()))
            .collect();
        assert_eq!(
            levels,
            vec![
                (0, vec!["main.cpp".to_string()]),
                (1, vec!["a.h".to_string(), "c.h".to_string()]),
                (2, vec!["b.h".to_string(), "b.h".to_string()]),
                (3, vec!["d.h".to_string()]),
            ]
        );
        assert_eq!(graph.max_depth(), 3);
    }

    #[test]
    fn test_ancestors_walk_to_root() {
        let graph = sample_graph();
        let deepest = graph.nodes().iter().find(|n| n.name == "d.h").unwrap();
        let chain: Vec<&str> = graph.ancestors(deepest.id).map(|n| n.name.as_str()).collect();
        assert_eq!(chain, vec!["d.h", "b.h", "c.h", "main.cpp"]);
    }
}
