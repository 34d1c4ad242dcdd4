mod engine;
mod compiler;
mod report;

// Include-tree reconstruction and queries
mod include_graph;

pub use compiler::{CompilerInvocation, read_trace};
pub use report::{ReportRenderer, CHAIN_SEPARATOR};

pub use include_graph::{
    IncludeGraph, IncludeNode, NodeId, Ancestors, file_name,
    TraceLineParser, TraceEntry,
    TreeBuilder,
    SystemClassifier,
    QueryEngine, IncludeChain, WhyAnswer, WhatAnswer, Subtree, SubtreeLine, LevelsAnswer,
    DuplicateInclude, GraphSummary
};

// Export the main engine
pub use engine::{Engine, QueryCommand, QueryRequest};
