//! Zarr V3 writer for rechunked time blocks.
//!
//! Each variable (and the `time` coordinate) becomes a 1-D array under the
//! store path, chunked along time at the output chunk size. Output chunks are
//! chunk-aligned, so every chunk is one independent write.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info};
use zarrs::array::codec::bytes_to_bytes::blosc::{
    BloscCodec, BloscCompressionLevel, BloscCompressor, BloscShuffleMode,
};
use zarrs::array::{Array, ArrayBuilder, DataType, FillValue};
use zarrs::array_subset::ArraySubset;
use zarrs::storage::{ReadableStorageTraits, WritableStorageTraits};

use crate::config::{ChunkingConfig, ZarrCompression};
use crate::error::{ChunkingError, Result};
use crate::types::TimeBlock;

/// Name of the time coordinate array.
pub const TIME_ARRAY: &str = "time";

/// Metadata describing a written record store.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ZarrMetadata {
    /// Total records along time.
    pub shape: usize,
    /// Records per chunk.
    pub chunk_size: usize,
    /// Number of chunks.
    pub num_chunks: usize,
    /// Data type of every array.
    pub dtype: String,
    /// Arrays written, including `time`.
    pub arrays: Vec<String>,
    /// Compression codec used.
    pub compression: String,
    /// Attributes attached to every array.
    pub attributes: BTreeMap<String, String>,
}

/// Result of writing a record store.
#[derive(Debug)]
pub struct ZarrWriteResult {
    pub metadata: ZarrMetadata,
    /// Total bytes written (uncompressed).
    pub bytes_written: u64,
}

/// Writer for 1-D Zarr V3 arrays from rechunked blocks.
pub struct ZarrChunkWriter {
    config: ChunkingConfig,
}

impl ZarrChunkWriter {
    /// Create a new writer with the given configuration.
    pub fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }

    /// Write `chunks` into a filesystem store at `path`, creating it.
    pub fn write_path(
        &self,
        path: &Path,
        chunks: &[TimeBlock],
        chunk_size: usize,
        attributes: &BTreeMap<String, String>,
    ) -> Result<ZarrWriteResult> {
        std::fs::create_dir_all(path)?;
        let store = zarrs_filesystem::FilesystemStore::new(path)
            .map_err(|e| ChunkingError::storage_error(e.to_string()))?;
        self.write(store, "/", chunks, chunk_size, attributes)
    }

    /// Write rechunked blocks to `storage` under `path`.
    ///
    /// Every chunk except the last must hold exactly `chunk_size` records and
    /// all chunks must carry the same variables.
    pub fn write<S>(
        &self,
        storage: S,
        path: &str,
        chunks: &[TimeBlock],
        chunk_size: usize,
        attributes: &BTreeMap<String, String>,
    ) -> Result<ZarrWriteResult>
    where
        S: ReadableStorageTraits + WritableStorageTraits + Send + Sync + 'static,
    {
        check_alignment(chunks, chunk_size)?;

        let total: usize = chunks.iter().map(TimeBlock::len).sum();
        let mut arrays = vec![TIME_ARRAY.to_string()];
        if let Some(first) = chunks.first() {
            arrays.extend(first.variable_names().map(str::to_string));
        }

        let store = Arc::new(storage);
        let mut bytes_written = 0u64;

        for name in &arrays {
            let node_path = array_path(path, name);
            let array = self.build_array(store.clone(), &node_path, total, chunk_size, attributes)?;
            array
                .store_metadata()
                .map_err(|e| ChunkingError::storage_error(e.to_string()))?;

            let write_chunk = |(index, chunk): (usize, &TimeBlock)| -> Result<u64> {
                let values = if name == TIME_ARRAY {
                    chunk.time()
                } else {
                    chunk.variable(name).ok_or_else(|| {
                        ChunkingError::incompatible(format!("chunk {} is missing '{}'", index, name))
                    })?
                };
                store_chunk(&array, index * chunk_size, values)
            };

            let written: Vec<u64> = if self.config.parallel_writes {
                chunks
                    .par_iter()
                    .enumerate()
                    .map(write_chunk)
                    .collect::<Result<_>>()?
            } else {
                chunks
                    .iter()
                    .enumerate()
                    .map(write_chunk)
                    .collect::<Result<_>>()?
            };

            bytes_written += written.iter().sum::<u64>();
            debug!(array = %node_path, records = total, "Wrote array");
        }

        let metadata = ZarrMetadata {
            shape: total,
            chunk_size,
            num_chunks: chunks.len(),
            dtype: "float64".to_string(),
            arrays,
            compression: self.config.zarr_compression.as_str().to_string(),
            attributes: attributes.clone(),
        };

        info!(
            path = %path,
            records = total,
            chunks = metadata.num_chunks,
            bytes = bytes_written,
            "Wrote record store"
        );

        Ok(ZarrWriteResult {
            metadata,
            bytes_written,
        })
    }

    /// Build a 1-D float64 array with the configured settings.
    fn build_array<S: ReadableStorageTraits + WritableStorageTraits + 'static>(
        &self,
        storage: Arc<S>,
        path: &str,
        len: usize,
        chunk_size: usize,
        attributes: &BTreeMap<String, String>,
    ) -> Result<Array<S>> {
        if chunk_size == 0 {
            return Err(ChunkingError::InvalidChunkSize(chunk_size));
        }

        let attrs: serde_json::Map<String, serde_json::Value> = attributes
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::json!(v)))
            .collect();

        let chunk_grid: zarrs::array::ChunkGrid = vec![chunk_size as u64]
            .try_into()
            .map_err(|e| ChunkingError::ConfigError(format!("{:?}", e)))?;

        let mut binding = ArrayBuilder::new(
            vec![len as u64],
            DataType::Float64,
            chunk_grid,
            FillValue::from(f64::NAN),
        );
        let mut builder = binding.attributes(attrs);

        if self.config.zarr_compression != ZarrCompression::None {
            let codec = self.create_compression_codec()?;
            builder = builder.bytes_to_bytes_codecs(vec![codec]);
        }

        builder
            .build(storage, path)
            .map_err(|e| ChunkingError::storage_error(e.to_string()))
    }

    /// Create the compression codec based on configuration.
    fn create_compression_codec(
        &self,
    ) -> Result<Arc<dyn zarrs::array::codec::BytesToBytesCodecTraits>> {
        let level = BloscCompressionLevel::try_from(self.config.zarr_compression_level)
            .map_err(|_| ChunkingError::ConfigError("Invalid compression level".to_string()))?;

        let (shuffle, typesize) = if self.config.zarr_shuffle {
            (BloscShuffleMode::Shuffle, Some(std::mem::size_of::<f64>()))
        } else {
            (BloscShuffleMode::NoShuffle, None)
        };

        let compressor = match self.config.zarr_compression {
            ZarrCompression::None => {
                return Err(ChunkingError::ConfigError(
                    "No compression configured".to_string(),
                ))
            }
            ZarrCompression::BloscLz4 => BloscCompressor::LZ4,
            ZarrCompression::BloscZstd => BloscCompressor::Zstd,
        };

        let codec = BloscCodec::new(compressor, level, None, shuffle, typesize)
            .map_err(|e| ChunkingError::ConfigError(e.to_string()))?;

        Ok(Arc::new(codec))
    }
}

/// Read a whole 1-D float64 array back from a record store.
pub fn read_array<S: ReadableStorageTraits + 'static>(
    storage: S,
    path: &str,
    name: &str,
) -> Result<Vec<f64>> {
    let array = Array::open(Arc::new(storage), &array_path(path, name))
        .map_err(|e| ChunkingError::zarr_error(e.to_string()))?;

    let len = array.shape().first().copied().unwrap_or(0);
    let subset = ArraySubset::new_with_start_shape(vec![0], vec![len])
        .map_err(|e| ChunkingError::zarr_error(e.to_string()))?;

    array
        .retrieve_array_subset_elements::<f64>(&subset)
        .map_err(|e| ChunkingError::zarr_error(e.to_string()))
}

fn array_path(group: &str, name: &str) -> String {
    format!("{}/{}", group.trim_end_matches('/'), name)
}

fn store_chunk<S: ReadableStorageTraits + WritableStorageTraits + 'static>(
    array: &Array<S>,
    offset: usize,
    values: &[f64],
) -> Result<u64> {
    if values.is_empty() {
        return Ok(0);
    }

    let subset = ArraySubset::new_with_start_shape(vec![offset as u64], vec![values.len() as u64])
        .map_err(|e| ChunkingError::storage_error(e.to_string()))?;

    array
        .store_array_subset_elements(&subset, values)
        .map_err(|e| ChunkingError::storage_error(e.to_string()))?;

    Ok(std::mem::size_of_val(values) as u64)
}

/// Every chunk but the last must be full, and all must share variables.
fn check_alignment(chunks: &[TimeBlock], chunk_size: usize) -> Result<()> {
    if chunk_size == 0 {
        return Err(ChunkingError::InvalidChunkSize(chunk_size));
    }

    let Some(first) = chunks.first() else {
        return Ok(());
    };

    let last = chunks.len() - 1;
    for (index, chunk) in chunks.iter().enumerate() {
        let full = chunk.len() == chunk_size;
        let valid = if index == last {
            chunk.len() <= chunk_size
        } else {
            full
        };
        if !valid {
            return Err(ChunkingError::MisalignedChunk {
                index,
                len: chunk.len(),
                chunk_size,
            });
        }

        if !chunk.variable_names().eq(first.variable_names()) {
            return Err(ChunkingError::incompatible(format!(
                "chunk {} variables differ from chunk 0",
                index
            )));
        }
    }

    Ok(())
}
