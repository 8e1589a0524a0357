//! Error types for rebalance-stats.

use thiserror::Error;

use crate::column::Column;

/// Result type for rebalance-stats operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reading, writing or aggregating result tables.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input has no header line
    #[error("missing header line")]
    MissingHeader,

    /// Header lacks a required column
    #[error("missing column: {0}")]
    MissingColumn(Column),

    /// Column name is not one of the result columns
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// Statistics were requested over a text column
    #[error("column {0} is not numeric")]
    NotNumeric(Column),

    /// A data line could not be parsed
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
