//! Error types for schoolmerge-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in schoolmerge-core
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input could not be parsed as tabular data
    #[error("unreadable table '{path}': {message}")]
    Format { path: PathBuf, message: String },

    /// CSV parsing error from the csv crate
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Required grouping column missing from the header
    #[error("input is missing the required '{column}' column")]
    Schema { column: String },

    /// Non-numeric cell in a column configured for summing
    #[error("cannot sum value '{value}' in column '{column}' (row {row})")]
    Aggregation {
        column: String,
        value: String,
        row: usize,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
