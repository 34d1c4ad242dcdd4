//! Reconstructs a C++ translation unit's include tree from a preprocessor
//! trace and answers why a header is present, what it pulls in, and which
//! headers are reachable through more than one path.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;

pub use crate::config::Config;
pub use crate::core::{Engine, IncludeGraph, QueryCommand, QueryEngine, QueryRequest, TreeBuilder};
pub use crate::error::{IncludeGraphError, Result};
