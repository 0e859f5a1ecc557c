//! Partition source blocks into fixed-size output chunks.
//!
//! Source blocks arrive with arbitrary lengths. The partitioner walks the
//! concatenated index space in steps of the target chunk size and, for each
//! step, emits the slices of whichever source blocks intersect it:
//!
//! ```text
//! sources:  |---- x1 (33) ----|---- x2 (33) ----|----- x3 (34) -----|
//! chunks:   |10 |10 |10 |3+7 |10 |10 |6+4 |10 |10 |10 |
//! ```

use std::fmt;

use crate::error::{ChunkingError, Result};
use crate::types::TimeBlock;

/// A contiguous slice `start..end` of one source block.
pub struct ChunkSlice<'a, B> {
    /// First record of the slice, relative to the source block.
    pub start: usize,
    /// One past the last record, relative to the source block.
    pub end: usize,
    /// The source block the slice reads from.
    pub block: &'a B,
}

impl<'a, B> ChunkSlice<'a, B> {
    pub fn new(start: usize, end: usize, block: &'a B) -> Self {
        Self { start, end, block }
    }

    /// Number of records covered by the slice.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl<B> Clone for ChunkSlice<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B> Copy for ChunkSlice<'_, B> {}

/// Two slices are equal when they cover the same range of the same block.
impl<B> PartialEq for ChunkSlice<'_, B> {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end && std::ptr::eq(self.block, other.block)
    }
}

impl<B> Eq for ChunkSlice<'_, B> {}

impl<B> fmt::Debug for ChunkSlice<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkSlice")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("block", &(self.block as *const B))
            .finish()
    }
}

/// One physical output chunk: slices in source order.
pub type OutputChunk<'a, B> = Vec<ChunkSlice<'a, B>>;

/// Partition `blocks` (with record counts `lengths`) into output chunks of
/// `chunk_size` records.
///
/// Returns the chunks and the total record count. The final chunk may be
/// shorter than `chunk_size`; every other chunk is exactly `chunk_size`.
/// Empty input yields no chunks and a total of zero.
pub fn constant_blocks<'a, B>(
    lengths: &[usize],
    blocks: &'a [B],
    chunk_size: usize,
) -> Result<(Vec<OutputChunk<'a, B>>, usize)> {
    if chunk_size == 0 {
        return Err(ChunkingError::InvalidChunkSize(chunk_size));
    }
    if lengths.len() != blocks.len() {
        return Err(ChunkingError::LengthMismatch {
            lengths: lengths.len(),
            blocks: blocks.len(),
        });
    }

    let total: usize = lengths.iter().sum();
    let mut chunks = Vec::with_capacity(total.div_ceil(chunk_size));
    let mut current: OutputChunk<'a, B> = Vec::new();
    let mut filled = 0;

    for (&len, block) in lengths.iter().zip(blocks) {
        let mut offset = 0;
        while offset < len {
            let take = (chunk_size - filled).min(len - offset);
            current.push(ChunkSlice::new(offset, offset + take, block));
            offset += take;
            filled += take;

            if filled == chunk_size {
                chunks.push(std::mem::take(&mut current));
                filled = 0;
            }
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    Ok((chunks, total))
}

/// Partition time blocks using their own record counts.
pub fn constant_time_blocks(
    blocks: &[TimeBlock],
    chunk_size: usize,
) -> Result<(Vec<OutputChunk<'_, TimeBlock>>, usize)> {
    let lengths: Vec<usize> = blocks.iter().map(TimeBlock::len).collect();
    constant_blocks(&lengths, blocks, chunk_size)
}

/// Record count of an output chunk.
pub fn chunk_len<B>(chunk: &[ChunkSlice<'_, B>]) -> usize {
    chunk.iter().map(ChunkSlice::len).sum()
}
