//! Zarr writer for rechunked records.
//!
//! Used at the end of a conversion run to write each record kind as a set
//! of 1-D Zarr V3 arrays sharing one time chunking.

mod zarr_writer;

pub use zarr_writer::{read_array, ZarrChunkWriter, ZarrMetadata, ZarrWriteResult, TIME_ARRAY};
