// src/core/include_graph/query.rs
use std::collections::HashMap;
use serde::{Serialize, Deserialize};

use crate::config::QueryConfig;
use super::{IncludeGraph, IncludeNode, NodeId, SystemClassifier};

/// Root-to-node chain of names explaining why a header is present
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludeChain {
    pub names: Vec<String>,
    /// Full path of the matched header
    pub full_path: String,
}

impl IncludeChain {
    /// Number of inclusion steps from the root
    pub fn hops(&self) -> usize {
        self.names.len().saturating_sub(1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhyAnswer {
    pub query: String,
    /// Nodes matching the query name
    pub matched: usize,
    /// Matches dropped because they are system headers
    pub hidden: usize,
    pub chains: Vec<IncludeChain>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtreeLine {
    /// Depth relative to the matched header
    pub depth: usize,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subtree {
    pub full_path: String,
    pub lines: Vec<SubtreeLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatAnswer {
    pub query: String,
    pub matched: usize,
    /// Matches dropped because they are system headers
    pub hidden: usize,
    /// Matches dropped because their name carries the reserved prefix
    pub reserved: usize,
    pub subtrees: Vec<Subtree>,
}

/// Depth levels whose nodes include a path fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelsAnswer {
    pub query: String,
    /// Ascending, each level listed once
    pub levels: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateInclude {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub root: String,
    pub total_nodes: usize,
    pub unique_headers: usize,
    pub duplicated_headers: usize,
    pub max_depth: usize,
    pub roots: usize,
}

/// Read-only questions over a finished include graph
pub struct QueryEngine<'g> {
    graph: &'g IncludeGraph,
    classifier: &'g SystemClassifier,
    config: &'g QueryConfig,
}

impl<'g> QueryEngine<'g> {
    pub fn new(graph: &'g IncludeGraph, classifier: &'g SystemClassifier, config: &'g QueryConfig) -> Self {
        Self {
            graph,
            classifier,
            config,
        }
    }

    /// Every node named `name`, or `name` + header suffix, in discovery order
    pub fn find(&self, name: &str) -> Vec<&'g IncludeNode> {
        let with_suffix = format!("{}{}", name, self.config.header_suffix);
        self.graph
            .nodes()
            .iter()
            .filter(|node| node.name == name || node.name == with_suffix)
            .collect()
    }

    /// Inclusion chains leading to each occurrence of `name`
    pub fn why(&self, name: &str, project_only: bool) -> WhyAnswer {
        let matches = self.find(name);
        let mut hidden = 0;
        let mut chains = Vec::new();

        for node in &matches {
            if project_only && self.classifier.is_system(node) {
                hidden += 1;
                continue;
            }
            chains.push(self.chain(node.id));
        }

        WhyAnswer {
            query: name.to_string(),
            matched: matches.len(),
            hidden,
            chains,
        }
    }

    /// The chain with the fewest hops; the earliest discovered wins a tie
    pub fn shortest_why(&self, name: &str, project_only: bool) -> WhyAnswer {
        let mut answer = self.why(name, project_only);
        let shortest = answer
            .chains
            .iter()
            .enumerate()
            .min_by_key(|(index, chain)| (chain.hops(), *index))
            .map(|(index, _)| index);

        answer.chains = match shortest {
            Some(index) => vec![answer.chains.swap_remove(index)],
            None => Vec::new(),
        };
        answer
    }

    /// Subtree listing for each occurrence of `name`
    pub fn what(&self, name: &str, project_only: bool) -> WhatAnswer {
        let matches = self.find(name);
        let mut hidden = 0;
        let mut reserved = 0;
        let mut subtrees = Vec::new();

        for node in &matches {
            if project_only && self.classifier.is_system(node) {
                hidden += 1;
                continue;
            }
            if self.is_reserved(node) {
                reserved += 1;
                continue;
            }
            subtrees.push(Subtree {
                full_path: node.full_path.clone(),
                lines: self.subtree_lines(node.id, project_only),
            });
        }

        WhatAnswer {
            query: name.to_string(),
            matched: matches.len(),
            hidden,
            reserved,
            subtrees,
        }
    }

    /// Levels holding a node whose full path contains `fragment`
    pub fn levels_including(&self, fragment: &str, project_only: bool) -> LevelsAnswer {
        let levels = self
            .graph
            .levels()
            .into_iter()
            .filter(|(_, nodes)| {
                nodes.iter().any(|node| {
                    node.full_path.contains(fragment) && !(project_only && self.classifier.is_system(node))
                })
            })
            .map(|(depth, _)| depth)
            .collect();

        LevelsAnswer {
            query: fragment.to_string(),
            levels,
        }
    }

    /// Names occurring more than once anywhere in the registry, in order of
    /// first appearance
    pub fn duplicates(&self) -> Vec<DuplicateInclude> {
        let mut counts: Vec<DuplicateInclude> = Vec::new();
        let mut index_by_name: HashMap<&str, usize> = HashMap::new();

        for node in self.graph.nodes() {
            match index_by_name.get(node.name.as_str()) {
                Some(&index) => counts[index].count += 1,
                None => {
                    index_by_name.insert(node.name.as_str(), counts.len());
                    counts.push(DuplicateInclude {
                        name: node.name.clone(),
                        count: 1,
                    });
                }
            }
        }

        counts.retain(|entry| entry.count > 1);
        counts
    }

    pub fn summary(&self) -> GraphSummary {
        let roots = self.graph.roots();
        let mut unique: Vec<&str> = self
            .graph
            .nodes()
            .iter()
            .filter(|node| !node.is_root())
            .map(|node| node.name.as_str())
            .collect();
        unique.sort_unstable();
        unique.dedup();

        GraphSummary {
            root: self.graph.root().map(|root| root.name.clone()).unwrap_or_default(),
            total_nodes: self.graph.len(),
            unique_headers: unique.len(),
            duplicated_headers: self.duplicates().len(),
            max_depth: self.graph.max_depth(),
            roots: roots.len(),
        }
    }

    fn is_reserved(&self, node: &IncludeNode) -> bool {
        let prefix = &self.config.reserved_prefix;
        !prefix.is_empty() && node.name.starts_with(prefix.as_str())
    }

    fn chain(&self, id: NodeId) -> IncludeChain {
        IncludeChain {
            names: self.graph.path(id).into_iter().map(str::to_string).collect(),
            full_path: self.graph.node(id).full_path.clone(),
        }
    }

    /// Preorder walk with an explicit stack. A filtered node hides its whole
    /// subtree; the reserved-prefix check applies to each node's own name.
    fn subtree_lines(&self, start: NodeId, project_only: bool) -> Vec<SubtreeLine> {
        let mut lines = Vec::new();
        let mut stack: Vec<(NodeId, usize)> = vec![(start, 0)];

        while let Some((id, depth)) = stack.pop() {
            let node = self.graph.node(id);
            if project_only && self.classifier.is_system(node) {
                continue;
            }
            if self.is_reserved(node) {
                continue;
            }

            lines.push(SubtreeLine {
                depth,
                name: node.name.clone(),
            });

            // Reverse so the first child is popped first
            for child in node.children.iter().rev() {
                stack.push((*child, depth + 1));
            }
        }

        lines
    }
}
