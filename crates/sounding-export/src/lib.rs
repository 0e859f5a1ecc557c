//! Sounding export for georeferenced multibeam data.
//!
//! Takes per-system ping datasets (time x beam grids of easting, northing and
//! depth) and writes them out as:
//!
//! - delimited point files, one per system or per system/sector/frequency
//!   (see [`export_pings_to_file`]);
//! - a chunked `soundings.zarr` dataset with one array per variable
//!   (see [`export_pings_to_dataset`]).
//!
//! Soundings the sonar rejected (`detectioninfo == 2`) can be filtered out and
//! depths can be flipped to positive up.

pub mod config;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod points;
pub mod zarr;

pub use config::{ExportConfig, DEFAULT_SOUNDING_CHUNK_SIZE};
pub use dataset::{PingDataset, Soundings, REJECTED_DETECTION};
pub use error::{ExportError, Result};
pub use filter::{generate_export_data, ExportData};
pub use points::{create_folder, csv_write, delimiter_byte, export_pings_to_file, ExportFormat};
pub use zarr::{
    export_pings_to_dataset, sounding_chunk_ranges, validate_written, DatasetExport, EXPORT_TIME_ATTRIBUTE,
    SOUNDINGS_DATASET, SYSTEM_IDENTIFIERS_ATTRIBUTE, VARIABLES_OF_INTEREST,
};
