//! Error types for rust_degsim

use thiserror::Error;

/// Main error type for DEG/function similarity analysis
#[derive(Error, Debug)]
pub enum DegSimError {
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Unknown category '{name}'")]
    UnknownCategory { name: String },

    #[error("Missing input: {reason}")]
    MissingInput { reason: String },

    #[error(
        "Degenerate groups for function '{function}': {n_degs} DEG and {n_background} background \
         observations (rank-sum test needs at least 2 in each)"
    )]
    DegenerateGroup {
        function: String,
        n_degs: usize,
        n_background: usize,
    },

    #[error("Zero-norm embedding row '{label}' in {table} table")]
    DegenerateEmbedding { table: String, label: String },

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: String, got: String },

    #[error("Empty data: {reason}")]
    EmptyData { reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for rust_degsim operations
pub type Result<T> = std::result::Result<T, DegSimError>;
