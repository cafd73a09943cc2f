//! CLI error types

use banker_core::BankerError;
use std::path::PathBuf;
use thiserror::Error;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Malformed matrix or vector text
    #[error("Parse error in {source_name} line {line}: {message}")]
    Parse {
        /// File or input the text came from
        source_name: String,
        /// 1-based line number
        line: usize,
        /// What was wrong
        message: String,
    },

    /// Could not read an input file
    #[error("Cannot read {path}: {source}")]
    ReadFile {
        /// File path
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Loaded matrices do not form a valid state
    #[error("Invalid state: {0}")]
    State(#[from] BankerError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config error
    #[error("Config error: {0}")]
    Config(String),
}
