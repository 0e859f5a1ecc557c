//! Command implementations.
//!
//! Each command reads its JSON inputs, runs the library operation and
//! returns a serializable report that `main` prints.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use record_chunking::{
    batch_read_configure_options, chunk_len, constant_blocks, RecordKind, RechunkSummary, TimeBlock,
    ZarrChunkWriter, ZarrMetadata,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sounding_export::{export_pings_to_dataset, export_pings_to_file, DatasetExport, ExportFormat, PingDataset};
use tracing::info;
use vessel_file::{create_new_vessel_file, SystemData, VesselFile};

use crate::config::KlusterConfig;

/// Chunk layout for a set of block lengths.
#[derive(Debug, Serialize, PartialEq)]
pub struct PlanReport {
    pub total: usize,
    /// Per output chunk: `[start, end, block index]` descriptors.
    pub chunks: Vec<Vec<[usize; 3]>>,
    /// Records per output chunk.
    pub chunk_lengths: Vec<usize>,
}

/// Lay out blocks of `lengths` records into chunks of `chunk_size`.
pub fn plan(lengths: &[usize], chunk_size: usize) -> Result<PlanReport> {
    let indices: Vec<usize> = (0..lengths.len()).collect();
    let (chunks, total) = constant_blocks(lengths, &indices, chunk_size)?;

    Ok(PlanReport {
        total,
        chunk_lengths: chunks.iter().map(|c| chunk_len(c)).collect(),
        chunks: chunks
            .iter()
            .map(|c| c.iter().map(|s| [s.start, s.end, *s.block]).collect())
            .collect(),
    })
}

/// Result of the `rechunk` command.
#[derive(Debug, Serialize)]
pub struct RechunkReport {
    pub kind: RecordKind,
    pub output: PathBuf,
    pub summary: RechunkSummary,
    pub metadata: ZarrMetadata,
}

/// Rechunk the blocks in `input` (a JSON list of time blocks) into a Zarr
/// store at `output`.
pub fn rechunk(
    config: &KlusterConfig,
    kind: RecordKind,
    input: &Path,
    output: &Path,
    chunk_size: Option<usize>,
) -> Result<Option<RechunkReport>> {
    let blocks: Vec<TimeBlock> = read_json(input)?;
    for (index, block) in blocks.iter().enumerate() {
        block
            .validate()
            .with_context(|| format!("Block {} in {:?} is malformed", index, input))?;
    }

    let mut options = batch_read_configure_options(&config.chunking);
    let batch = options
        .get_mut(&kind)
        .with_context(|| format!("No read options for {}", kind))?;
    if let Some(size) = chunk_size {
        batch.chunksize = size;
    }

    info!(kind = %kind, blocks = blocks.len(), chunk_size = batch.chunksize, "Rechunking");
    for block in blocks {
        batch.push_block(block);
    }

    let writer = ZarrChunkWriter::new(config.chunking.clone());
    let report = batch.finalize(&writer, output)?.map(|(summary, written)| RechunkReport {
        kind,
        output: output.to_path_buf(),
        summary,
        metadata: written.metadata,
    });
    Ok(report)
}

/// Every system in a vessel file.
pub fn vessel_show(path: &Path) -> Result<serde_json::Value> {
    let vessel = VesselFile::open(path)?;
    Ok(serde_json::to_value(&vessel.data)?)
}

/// Entries of `system` in effect between `start` and `end`.
pub fn vessel_query(path: &Path, system: &str, start: i64, end: i64) -> Result<Option<SystemData>> {
    let vessel = VesselFile::open(path)?;
    vessel.system(system)?;
    Ok(vessel.return_data(system, start, end))
}

/// Merge the entries in `data` (a JSON system record) into `system`.
///
/// Creates the vessel file when `create` is set and it does not exist yet.
pub fn vessel_update(path: &Path, system: &str, data: &Path, carry_over_tpu: bool, create: bool) -> Result<SystemData> {
    let incoming: SystemData = read_json(data)?;

    let mut vessel = if create && !path.exists() {
        create_new_vessel_file(path)?
    } else {
        VesselFile::open(path)?
    };

    vessel.update(system, incoming, carry_over_tpu);
    vessel.save(path)?;
    Ok(vessel.system(system)?.clone())
}

/// Result of the `export` command.
#[derive(Debug, Serialize)]
pub struct ExportReport {
    pub files: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soundings: Option<usize>,
}

/// Export ping datasets from `input` (a JSON list) as point files, or as a
/// sounding dataset when `dataset` is set.
pub fn export(
    config: &KlusterConfig,
    input: &Path,
    output_directory: &Path,
    format: ExportFormat,
    dataset: bool,
    validate: bool,
) -> Result<ExportReport> {
    let datasets: Vec<PingDataset> = read_json(input)?;

    if dataset {
        let writer = ZarrChunkWriter::new(config.chunking.clone());
        let path = output_directory.join(sounding_export::SOUNDINGS_DATASET);
        let DatasetExport { path, soundings, .. } =
            export_pings_to_dataset(&datasets, &path, &writer, &config.export, validate)?;
        return Ok(ExportReport {
            files: Vec::new(),
            dataset: Some(path),
            soundings: Some(soundings),
        });
    }

    let files = export_pings_to_file(&datasets, output_directory, format, &config.export)?;
    Ok(ExportReport {
        files,
        dataset: None,
        soundings: None,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON from {:?}", path))
}
