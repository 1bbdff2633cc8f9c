//! Error types for the CSV Doctor library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for CSV Doctor operations.
#[derive(Debug, Error)]
pub enum DoctorError {
    /// A row does not have one cell per header.
    #[error("Malformed table: row {row} has {found} cells, expected {expected}")]
    MalformedTable {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A fix was requested for an issue that cannot be fixed automatically.
    #[error("Unsupported fix: {0}")]
    UnsupportedFix(String),

    /// A fix could not be computed for the current data.
    #[error("Fix error: {0}")]
    Fix(String),

    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid delimiter detected or specified.
    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),

    /// Empty file or no data to analyze.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DoctorError {
    /// Shorthand for an [`DoctorError::UnsupportedFix`] error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        DoctorError::UnsupportedFix(message.into())
    }
}

/// Result type alias for CSV Doctor operations.
pub type Result<T> = std::result::Result<T, DoctorError>;
