//! Error types for record chunking.

use thiserror::Error;

/// Errors that can occur while partitioning, merging or writing records.
#[derive(Error, Debug)]
pub enum ChunkingError {
    /// Target chunk size must be positive.
    #[error("invalid chunk size: {0}")]
    InvalidChunkSize(usize),

    /// The length list and block list differ in size.
    #[error("{lengths} source lengths given for {blocks} source blocks")]
    LengthMismatch { lengths: usize, blocks: usize },

    /// A slice falls outside the block it refers to.
    #[error("slice {start}..{end} is outside a block of {len} records")]
    SliceOutOfBounds { start: usize, end: usize, len: usize },

    /// A data variable does not match the time coordinate length.
    #[error("variable '{name}' has {actual} values, expected {expected}")]
    VariableLength {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// Blocks cannot be concatenated.
    #[error("incompatible blocks: {0}")]
    IncompatibleBlocks(String),

    /// An output chunk does not line up with the array chunk grid.
    #[error("chunk {index} holds {len} records, expected {chunk_size}")]
    MisalignedChunk {
        index: usize,
        len: usize,
        chunk_size: usize,
    },

    /// Invalid argument to a helper.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Zarr format error.
    #[error("Zarr format error: {0}")]
    ZarrError(String),

    /// Storage/IO error.
    #[error("storage error: {0}")]
    StorageError(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl ChunkingError {
    /// Create an IncompatibleBlocks error.
    pub fn incompatible(msg: impl Into<String>) -> Self {
        Self::IncompatibleBlocks(msg.into())
    }

    /// Create a ZarrError.
    pub fn zarr_error(msg: impl Into<String>) -> Self {
        Self::ZarrError(msg.into())
    }

    /// Create a StorageError.
    pub fn storage_error(msg: impl Into<String>) -> Self {
        Self::StorageError(msg.into())
    }
}

impl From<std::io::Error> for ChunkingError {
    fn from(err: std::io::Error) -> Self {
        Self::StorageError(err.to_string())
    }
}

/// Result type for chunking operations.
pub type Result<T> = std::result::Result<T, ChunkingError>;
