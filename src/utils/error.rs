//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while loading a raw trace file
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read trace file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Cannot find nsys CSV header in {0}")]
    MissingHeader(String),

    #[error("CSV parsing failed: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Malformed trace for rank '{rank}': {reason}")]
    MalformedTrace { rank: String, reason: String },
}

/// Errors that can occur during cross-rank aggregation
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("No traces to aggregate (empty input set)")]
    EmptyInputSet,
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Failed to write CSV: {0}")]
    CsvFailed(#[from] csv::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
