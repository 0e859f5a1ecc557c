//! Time-series record rechunking for fixed-size array writes.
//!
//! Raw multibeam records arrive in irregular time blocks, one or more per
//! source file. Before they are written to a chunked array store they are
//! realigned into fixed-size chunks:
//!
//! ```text
//! source blocks (per file)
//!      │
//!      ▼
//! stitch_blocks()          drop duplicate records at shared boundaries
//!      │
//!      ▼
//! constant_blocks()        plan output chunks as slices of source blocks
//!      │
//!      ▼
//! merge_constant_blocks()  concatenate the slices of each output chunk
//!      │
//!      ▼
//! ZarrChunkWriter          one chunk-aligned write per output chunk
//! ```
//!
//! # Example
//!
//! ```
//! use record_chunking::{rechunk, TimeBlock};
//!
//! let a = TimeBlock::new(vec![0.0, 1.0, 2.0]);
//! let b = TimeBlock::new(vec![2.0, 3.0, 4.0, 5.0]);
//! let result = rechunk(&[a, b], 4).unwrap();
//!
//! assert_eq!(result.summary.dropped_duplicates, 1);
//! assert_eq!(result.chunks[0].time(), &[0.0, 1.0, 2.0, 3.0]);
//! assert_eq!(result.chunks[1].time(), &[4.0, 5.0]);
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod merge;
pub mod partition;
pub mod rechunk;
pub mod serial;
pub mod split;
pub mod types;
pub mod writer;

// Re-export commonly used types at crate root
pub use batch::{batch_read_configure_options, BatchReadOptions, RecordKind};
pub use config::{ChunkingConfig, ZarrCompression};
pub use error::{ChunkingError, Result};
pub use merge::merge_constant_blocks;
pub use partition::{chunk_len, constant_blocks, constant_time_blocks, ChunkSlice, OutputChunk};
pub use rechunk::{rechunk, RechunkSummary, Rechunked};
pub use serial::{build_serial_mask, is_bit_set, SerialMask};
pub use split::{correct_for_splits, needs_split_correction, stitch_blocks};
pub use types::{has_records, TimeBlock};
pub use writer::{read_array, ZarrChunkWriter, ZarrMetadata, ZarrWriteResult};
