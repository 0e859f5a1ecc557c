//! Rechunk adjacent source blocks into fixed-size output blocks.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::merge::merge_constant_blocks;
use crate::partition::{constant_blocks, ChunkSlice};
use crate::split::stitch_blocks;
use crate::types::TimeBlock;

/// Summary of a rechunk pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RechunkSummary {
    /// Records across all source blocks.
    pub source_records: usize,
    /// Records across all output chunks.
    pub output_records: usize,
    /// Records dropped as boundary duplicates.
    pub dropped_duplicates: usize,
    /// Number of output chunks.
    pub chunk_count: usize,
    /// Target chunk size.
    pub chunk_size: usize,
}

/// Output of a rechunk pass.
#[derive(Debug, Clone)]
pub struct Rechunked {
    /// One block per output chunk, in time order.
    pub chunks: Vec<TimeBlock>,
    pub summary: RechunkSummary,
}

/// Stitch, partition and merge `blocks` into chunks of `chunk_size` records.
///
/// Blocks must already be in time order. Every output chunk except the last
/// holds exactly `chunk_size` records.
pub fn rechunk(blocks: &[TimeBlock], chunk_size: usize) -> Result<Rechunked> {
    let source_records: usize = blocks.iter().map(TimeBlock::len).sum();

    let (stitched, dropped_duplicates) = stitch_blocks(blocks);
    let lengths: Vec<usize> = stitched.iter().map(|b| b.len()).collect();
    let (plan, total) = constant_blocks(&lengths, &stitched, chunk_size)?;

    let mut chunks = Vec::with_capacity(plan.len());
    for (index, output) in plan.iter().enumerate() {
        let slices: Vec<_> = output
            .iter()
            .map(|s| ChunkSlice::new(s.start, s.end, &**s.block))
            .collect();
        let merged = merge_constant_blocks(&slices)?;
        debug!(chunk = index, records = merged.len(), sources = slices.len(), "Merged output chunk");
        chunks.push(merged);
    }

    let summary = RechunkSummary {
        source_records,
        output_records: total,
        dropped_duplicates,
        chunk_count: chunks.len(),
        chunk_size,
    };

    info!(
        source_records = summary.source_records,
        output_records = summary.output_records,
        dropped = summary.dropped_duplicates,
        chunks = summary.chunk_count,
        chunk_size,
        "Rechunked records"
    );

    Ok(Rechunked { chunks, summary })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(start: usize, end: usize) -> TimeBlock {
        let values: Vec<f64> = (start..end).map(|v| v as f64).collect();
        TimeBlock::new(values.clone())
            .with_variable("tstone", values)
            .unwrap()
    }

    #[test]
    fn test_rechunk_conserves_records() {
        let blocks = vec![block(0, 33), block(33, 66), block(66, 100)];
        let result = rechunk(&blocks, 10).unwrap();

        assert_eq!(result.summary.output_records, 100);
        assert_eq!(result.summary.dropped_duplicates, 0);
        assert_eq!(result.chunks.len(), 10);
        assert!(result.chunks.iter().all(|c| c.len() == 10));

        let values: Vec<f64> = result
            .chunks
            .iter()
            .flat_map(|c| c.variable("tstone").unwrap().to_vec())
            .collect();
        let expected: Vec<f64> = (0..100).map(|v| v as f64).collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn test_rechunk_drops_boundary_duplicate() {
        let blocks = vec![block(0, 100), block(99, 199)];
        let result = rechunk(&blocks, 64).unwrap();

        assert_eq!(result.summary.source_records, 200);
        assert_eq!(result.summary.output_records, 199);
        assert_eq!(result.summary.dropped_duplicates, 1);
        assert_eq!(result.chunks.last().unwrap().len(), 199 - 3 * 64);

        let times: Vec<f64> = result.chunks.iter().flat_map(|c| c.time().to_vec()).collect();
        assert!(times.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_rechunk_empty() {
        let result = rechunk(&[], 10).unwrap();
        assert!(result.chunks.is_empty());
        assert_eq!(result.summary.output_records, 0);
    }
}
