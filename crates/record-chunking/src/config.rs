//! Configuration for record chunking and Zarr writes.

use serde::{Deserialize, Serialize};

use crate::batch::RecordKind;

/// Configuration for rechunking and writing records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Output chunk size (records) for ping data.
    pub ping_chunk_size: usize,

    /// Output chunk size (records) for attitude data.
    pub attitude_chunk_size: usize,

    /// Output chunk size (records) for navigation data.
    pub navigation_chunk_size: usize,

    /// Beam dimension chunk for ping arrays.
    pub max_beams: usize,

    /// Compression codec for Zarr arrays.
    pub zarr_compression: ZarrCompression,

    /// Compression level (1-9).
    pub zarr_compression_level: u8,

    /// Enable byte shuffle filter for better compression.
    pub zarr_shuffle: bool,

    /// Write output chunks in parallel.
    pub parallel_writes: bool,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            ping_chunk_size: 1000,
            attitude_chunk_size: 20000,
            navigation_chunk_size: 50000,
            max_beams: 400,
            zarr_compression: ZarrCompression::BloscZstd,
            zarr_compression_level: 1,
            zarr_shuffle: true,
            parallel_writes: true,
        }
    }
}

impl ChunkingConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("PING_CHUNK_SIZE") {
            if let Ok(size) = val.parse() {
                config.ping_chunk_size = size;
            }
        }

        if let Ok(val) = std::env::var("ATTITUDE_CHUNK_SIZE") {
            if let Ok(size) = val.parse() {
                config.attitude_chunk_size = size;
            }
        }

        if let Ok(val) = std::env::var("NAVIGATION_CHUNK_SIZE") {
            if let Ok(size) = val.parse() {
                config.navigation_chunk_size = size;
            }
        }

        if let Ok(val) = std::env::var("MAX_BEAMS") {
            if let Ok(beams) = val.parse() {
                config.max_beams = beams;
            }
        }

        if let Ok(val) = std::env::var("ZARR_COMPRESSION") {
            config.zarr_compression = ZarrCompression::from_str(&val);
        }

        if let Ok(val) = std::env::var("ZARR_COMPRESSION_LEVEL") {
            if let Ok(level) = val.parse() {
                config.zarr_compression_level = level;
            }
        }

        if let Ok(val) = std::env::var("ZARR_SHUFFLE") {
            config.zarr_shuffle = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = std::env::var("PARALLEL_WRITES") {
            config.parallel_writes = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        for kind in RecordKind::ALL {
            if self.chunk_size_for(kind) == 0 {
                return Err(format!("{} chunk size must be > 0", kind));
            }
        }

        if self.max_beams == 0 {
            return Err("max_beams must be > 0".to_string());
        }

        if self.zarr_compression_level == 0 || self.zarr_compression_level > 9 {
            return Err("zarr_compression_level must be 1-9".to_string());
        }

        Ok(())
    }

    /// Output chunk size for a record kind.
    pub fn chunk_size_for(&self, kind: RecordKind) -> usize {
        match kind {
            RecordKind::Ping => self.ping_chunk_size,
            RecordKind::Attitude => self.attitude_chunk_size,
            RecordKind::Navigation => self.navigation_chunk_size,
        }
    }
}

/// Compression codec for Zarr arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZarrCompression {
    /// No compression.
    None,
    /// Blosc with LZ4.
    BloscLz4,
    /// Blosc with Zstd (recommended).
    #[default]
    BloscZstd,
}

impl ZarrCompression {
    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "none" => Self::None,
            "lz4" | "blosc_lz4" => Self::BloscLz4,
            "zstd" | "blosc_zstd" => Self::BloscZstd,
            _ => Self::BloscZstd,
        }
    }

    /// Get the codec name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::BloscLz4 => "blosc_lz4",
            Self::BloscZstd => "blosc_zstd",
        }
    }
}

impl std::fmt::Display for ZarrCompression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
