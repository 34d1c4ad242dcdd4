use thiserror::Error;

/// Main error type for include-graph operations
#[derive(Error, Debug)]
pub enum IncludeGraphError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Compiler '{0}' not found, please install it or set compiler.program")]
    CompilerNotFound(String),

    #[error("Compiler error: {0}")]
    Compiler(String),

    #[error("Invalid trace entry at depth {depth}: {reason}")]
    InvalidTraceEntry { depth: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, IncludeGraphError>;
