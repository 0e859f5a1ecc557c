//! Error types shared by the kluster crates.

use thiserror::Error;

/// Result type alias using CommonError.
pub type CommonResult<T> = Result<T, CommonError>;

/// Errors raised by the shared helpers.
#[derive(Debug, Error)]
pub enum CommonError {
    #[error("Invalid timestamp key: {0}")]
    InvalidTimestamp(String),

    #[error("Timestamp out of range: {0}")]
    TimestampOutOfRange(i64),

    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl CommonError {
    /// Create an InvalidValue error.
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}
