//! Error types for vessel configuration files.

use std::path::PathBuf;

use kluster_common::CommonError;
use thiserror::Error;

/// Result type alias using VesselFileError.
pub type Result<T> = std::result::Result<T, VesselFileError>;

/// Errors that can occur while reading, editing or writing a vessel file.
#[derive(Debug, Error)]
pub enum VesselFileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid timestamp in '{system}/{entry}': {source}")]
    InvalidTimestamp {
        system: String,
        entry: String,
        #[source]
        source: CommonError,
    },

    #[error("Unknown system: {0}")]
    UnknownSystem(String),

    #[error("Vessel file not found: {0}")]
    NotFound(PathBuf),
}
