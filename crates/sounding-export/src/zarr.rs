//! Sounding dataset export.
//!
//! Every system's georeferenced soundings are flattened, cut into ranges of at
//! most `sounding_chunk_size`, laid out with the chunk partitioner and written
//! as one Zarr array per variable.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use kluster_common::export_time_attribute;
use record_chunking::{
    constant_time_blocks, merge_constant_blocks, read_array, ChunkingError, TimeBlock, ZarrChunkWriter, ZarrMetadata,
};
use tracing::{info, warn};
use zarrs_filesystem::FilesystemStore;

use crate::config::ExportConfig;
use crate::dataset::{PingDataset, Soundings};
use crate::error::{ExportError, Result};

/// Name of the sounding dataset created next to the converted data.
pub const SOUNDINGS_DATASET: &str = "soundings.zarr";

/// Attribute recording when the dataset was exported.
pub const EXPORT_TIME_ATTRIBUTE: &str = "xyzdat_export_time";

/// Attribute listing the system identifiers, indexed by `system_index`.
pub const SYSTEM_IDENTIFIERS_ATTRIBUTE: &str = "system_identifiers";

/// Variables written when present in the first dataset.
pub const VARIABLES_OF_INTEREST: [&str; 5] = ["x", "y", "z", "tvu", "thu"];

/// Summary of a sounding dataset export.
#[derive(Debug, Clone)]
pub struct DatasetExport {
    pub path: PathBuf,
    /// Soundings written.
    pub soundings: usize,
    pub metadata: ZarrMetadata,
}

/// Half-open `[start, end)` ranges covering `len` soundings.
///
/// Ranges hold `max` soundings; the last absorbs any remainder, so it may
/// hold up to `2 * max - 1`. Empty input gives no ranges.
pub fn sounding_chunk_ranges(len: usize, max: usize) -> Vec<(usize, usize)> {
    if len == 0 {
        return Vec::new();
    }

    let size = len.min(max.max(1));
    let mut ranges: Vec<(usize, usize)> = (0..len / size).map(|i| (i * size, i * size + size)).collect();
    if let Some(last) = ranges.last_mut() {
        last.1 = len;
    }
    ranges
}

/// Write the soundings of every dataset to a new Zarr store at `output_path`.
///
/// Soundings without a position are skipped. Each variable of
/// [`VARIABLES_OF_INTEREST`] found in the first dataset is written, plus
/// `beam_number`, `frequency` and `system_index`. With `validate`, the stored
/// `x` array is read back and must hold every georeferenced sounding; a store
/// failing that check is removed.
pub fn export_pings_to_dataset(
    datasets: &[PingDataset],
    output_path: &Path,
    writer: &ZarrChunkWriter,
    config: &ExportConfig,
    validate: bool,
) -> Result<DatasetExport> {
    info!(path = %output_path.display(), "Exporting xyz data to dataset");
    let start = Instant::now();

    let first = datasets.first().ok_or(ExportError::NoData)?;
    if first.x.is_empty() {
        return Err(ExportError::missing(&first.system_identifier, "x"));
    }
    if output_path.exists() {
        return Err(ExportError::DatasetExists(output_path.to_path_buf()));
    }

    let variables: Vec<&str> = VARIABLES_OF_INTEREST
        .into_iter()
        .filter(|v| variable(first, v).is_some())
        .collect();
    for skipped in VARIABLES_OF_INTEREST.iter().filter(|v| !variables.contains(*v)) {
        warn!(variable = %skipped, "Skipping variable, not found in dataset");
    }

    let mut blocks = Vec::new();
    for (index, dataset) in datasets.iter().enumerate() {
        let soundings = dataset.stack()?;
        let positioned = soundings.select(&soundings.position_mask());
        let block = sounding_block(dataset, &positioned, &variables, index)?;

        for (start, end) in sounding_chunk_ranges(block.len(), config.sounding_chunk_size) {
            blocks.push(block.slice(start, end)?);
        }
    }

    let (plan, total) = constant_time_blocks(&blocks, config.sounding_chunk_size)?;
    let chunks = plan
        .iter()
        .map(|slices| merge_constant_blocks(slices))
        .collect::<record_chunking::Result<Vec<_>>>()?;

    let mut attributes = first.attributes.clone();
    attributes.insert(EXPORT_TIME_ATTRIBUTE.to_string(), export_time_attribute(&Utc::now()));
    let identifiers: Vec<&str> = datasets.iter().map(|d| d.system_identifier.as_str()).collect();
    attributes.insert(SYSTEM_IDENTIFIERS_ATTRIBUTE.to_string(), identifiers.join(","));

    let written = writer.write_path(output_path, &chunks, config.sounding_chunk_size, &attributes)?;

    if validate {
        let expected: usize = datasets.iter().map(PingDataset::valid_sounding_count).sum();
        validate_written(output_path, expected)?;
    }

    info!(
        path = %output_path.display(),
        soundings = total,
        elapsed_secs = start.elapsed().as_secs_f64(),
        "Exporting xyz data to dataset complete"
    );

    Ok(DatasetExport {
        path: output_path.to_path_buf(),
        soundings: total,
        metadata: written.metadata,
    })
}

/// Check that the store at `output_path` holds `expected` positioned soundings.
///
/// The store is removed when the count differs or cannot be read.
pub fn validate_written(output_path: &Path, expected: usize) -> Result<usize> {
    let actual = match stored_sounding_count(output_path) {
        Ok(actual) => actual,
        Err(e) => {
            fs::remove_dir_all(output_path)?;
            return Err(e);
        }
    };

    if actual != expected {
        warn!(
            path = %output_path.display(),
            expected,
            actual,
            "Sounding count mismatch, removing dataset"
        );
        fs::remove_dir_all(output_path)?;
        return Err(ExportError::ValidationFailed { expected, actual });
    }

    info!(soundings = actual, "Sounding dataset validated successfully");
    Ok(actual)
}

fn stored_sounding_count(output_path: &Path) -> Result<usize> {
    let store = FilesystemStore::new(output_path).map_err(|e| ChunkingError::storage_error(e.to_string()))?;
    let x = read_array(store, "/", "x")?;
    Ok(x.iter().filter(|v| !v.is_nan()).count())
}

fn variable<'a>(dataset: &'a PingDataset, name: &str) -> Option<&'a [f64]> {
    match name {
        "x" => Some(&dataset.x),
        "y" => Some(&dataset.y),
        "z" => Some(&dataset.z),
        "tvu" => dataset.tvu.as_deref(),
        "thu" => dataset.thu.as_deref(),
        _ => None,
    }
}

fn stacked<'a>(soundings: &'a Soundings, name: &str) -> Option<&'a [f64]> {
    match name {
        "x" => Some(&soundings.x),
        "y" => Some(&soundings.y),
        "z" => Some(&soundings.z),
        "tvu" => soundings.tvu.as_deref(),
        "thu" => soundings.thu.as_deref(),
        _ => None,
    }
}

fn sounding_block(
    dataset: &PingDataset,
    soundings: &Soundings,
    variables: &[&str],
    system_index: usize,
) -> Result<TimeBlock> {
    let mut block = TimeBlock::new(soundings.time.clone());

    for name in variables {
        let values = stacked(soundings, name).ok_or_else(|| ExportError::missing(&dataset.system_identifier, *name))?;
        block.insert_variable(*name, values.to_vec())?;
    }

    block.insert_variable("beam_number", soundings.beam.iter().map(|&b| f64::from(b)).collect())?;
    let frequency = match &soundings.frequency {
        Some(freq) => freq.iter().map(|&f| f as f64).collect(),
        None => vec![f64::NAN; soundings.len()],
    };
    block.insert_variable("frequency", frequency)?;
    block.insert_variable("system_index", vec![system_index as f64; soundings.len()])?;

    Ok(block)
}
