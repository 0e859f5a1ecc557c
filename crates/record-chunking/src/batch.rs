//! Batch read options per record kind.
//!
//! A conversion run reads many source files; the blocks for each record
//! kind are collected into `BatchReadOptions` and written out together once
//! every file has been read.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ChunkingConfig;
use crate::error::Result;
use crate::rechunk::{rechunk, RechunkSummary};
use crate::types::TimeBlock;
use crate::writer::{ZarrChunkWriter, ZarrWriteResult};

/// Kinds of records read from multibeam files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Ping,
    Attitude,
    Navigation,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [RecordKind::Ping, RecordKind::Attitude, RecordKind::Navigation];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Ping => "ping",
            RecordKind::Attitude => "attitude",
            RecordKind::Navigation => "navigation",
        }
    }

    /// Parse from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ping" => Some(RecordKind::Ping),
            "attitude" => Some(RecordKind::Attitude),
            "navigation" | "nav" => Some(RecordKind::Navigation),
            _ => None,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Read options and accumulated output for one record kind.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchReadOptions {
    /// Output chunk size along time.
    pub chunksize: usize,
    /// Chunk size per dimension.
    pub chunks: BTreeMap<String, usize>,
    /// Union attributes across blocks instead of keeping the first block's.
    pub combine_attributes: bool,
    /// Blocks read so far.
    pub output_arrs: Vec<TimeBlock>,
    /// Start time of each block in `output_arrs`.
    pub time_arrs: Vec<f64>,
    /// Store written by `finalize`.
    pub final_pths: Option<PathBuf>,
    /// Attributes written by `finalize`.
    pub final_attrs: Option<BTreeMap<String, String>>,
}

impl BatchReadOptions {
    /// Queue a block read from one source file. Empty blocks are ignored.
    pub fn push_block(&mut self, block: TimeBlock) {
        match block.min_time() {
            Some(start) => {
                self.time_arrs.push(start);
                self.output_arrs.push(block);
            }
            None => warn!("Skipping empty block"),
        }
    }

    /// Queued blocks ordered by start time.
    pub fn blocks_in_time_order(&self) -> Vec<TimeBlock> {
        let mut order: Vec<usize> = (0..self.output_arrs.len()).collect();
        order.sort_by(|&a, &b| self.time_arrs[a].total_cmp(&self.time_arrs[b]));
        order.into_iter().map(|i| self.output_arrs[i].clone()).collect()
    }

    /// Attributes for the written store.
    pub fn merged_attributes(&self, ordered: &[TimeBlock]) -> BTreeMap<String, String> {
        if self.combine_attributes {
            let mut attrs = BTreeMap::new();
            for block in ordered {
                for (key, value) in block.attributes() {
                    attrs.entry(key.clone()).or_insert_with(|| value.clone());
                }
            }
            attrs
        } else {
            ordered
                .first()
                .map(|b| b.attributes().clone())
                .unwrap_or_default()
        }
    }

    /// Rechunk the queued blocks and write them with `writer`.
    ///
    /// Records the store path and attributes on success. Returns `None` when
    /// nothing was queued.
    pub fn finalize(
        &mut self,
        writer: &ZarrChunkWriter,
        output_path: impl Into<PathBuf>,
    ) -> Result<Option<(RechunkSummary, ZarrWriteResult)>> {
        if self.output_arrs.is_empty() {
            return Ok(None);
        }

        let output_path = output_path.into();
        let ordered = self.blocks_in_time_order();
        let attrs = self.merged_attributes(&ordered);

        let rechunked = rechunk(&ordered, self.chunksize)?;
        let written = writer.write_path(&output_path, &rechunked.chunks, self.chunksize, &attrs)?;
        info!(
            path = %output_path.display(),
            records = rechunked.summary.output_records,
            "Finalized batch"
        );

        self.final_pths = Some(output_path);
        self.final_attrs = Some(attrs);
        Ok(Some((rechunked.summary, written)))
    }
}

/// Build empty read options for every record kind.
pub fn batch_read_configure_options(config: &ChunkingConfig) -> BTreeMap<RecordKind, BatchReadOptions> {
    RecordKind::ALL
        .into_iter()
        .map(|kind| {
            let chunksize = config.chunk_size_for(kind);
            let mut chunks = BTreeMap::from([("time".to_string(), chunksize)]);
            if kind == RecordKind::Ping {
                chunks.insert("beam".to_string(), config.max_beams);
            }

            let options = BatchReadOptions {
                chunksize,
                chunks,
                combine_attributes: kind == RecordKind::Ping,
                ..Default::default()
            };
            (kind, options)
        })
        .collect()
}
