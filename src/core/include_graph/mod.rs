// src/core/include_graph/mod.rs
//! Include-tree reconstruction and queries
//!
//! A preprocessor trace (`clang++ -E -H`) lists every header the compiler
//! entered, prefixed by one marker per nesting level. This module turns that
//! trace back into a tree and answers why a header is present, what it pulls
//! in, and which headers arrive through more than one path.

mod graph;
mod trace_parser;
mod tree_builder;
mod classifier;
mod query;

pub use graph::{IncludeGraph, IncludeNode, NodeId, Ancestors, file_name};
pub use trace_parser::{TraceLineParser, TraceEntry};
pub use tree_builder::TreeBuilder;
pub use classifier::SystemClassifier;
pub use query::{
    QueryEngine, IncludeChain, WhyAnswer, WhatAnswer, Subtree, SubtreeLine, LevelsAnswer,
    DuplicateInclude, GraphSummary
};
