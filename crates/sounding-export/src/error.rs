//! Error types for sounding export.

use std::path::PathBuf;

use record_chunking::ChunkingError;
use thiserror::Error;

/// Result type alias using ExportError.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Errors that can occur during sounding export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid csv delimiter {0:?}, expected a single byte")]
    InvalidDelimiter(String),

    #[error("Chunking error: {0}")]
    Chunking(#[from] ChunkingError),

    #[error("No ping datasets to export")]
    NoData,

    #[error("{system}: variable '{variable}' not found, georeference soundings first")]
    MissingVariable { system: String, variable: String },

    #[error("{0}: unable to filter by detection type, detectioninfo not found")]
    DetectionInfoRequired(String),

    #[error("{system}: '{variable}' has {actual} values, expected {expected}")]
    ShapeMismatch {
        system: String,
        variable: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid export format: {0}")]
    InvalidFormat(String),

    #[error("Export format '{0}' is not supported")]
    UnsupportedFormat(String),

    #[error("Dataset exists already ({0}), please remove and run")]
    DatasetExists(PathBuf),

    #[error("Sounding count mismatch: {expected} before export, {actual} written")]
    ValidationFailed { expected: usize, actual: usize },
}

impl ExportError {
    /// Create a MissingVariable error.
    pub fn missing(system: impl Into<String>, variable: impl Into<String>) -> Self {
        Self::MissingVariable {
            system: system.into(),
            variable: variable.into(),
        }
    }
}
