//! Correct duplicate records at block boundaries.
//!
//! A record straddling two source files shows up at the end of one block and
//! at the start of the next with the same timestamp. The later copy is dropped.

use std::borrow::Cow;

use tracing::debug;

use crate::types::TimeBlock;

/// True when the last time of `first` equals the first time of `second`.
pub fn needs_split_correction(first: &TimeBlock, second: &TimeBlock) -> bool {
    match (first.last_time(), second.first_time()) {
        (Some(last), Some(next)) => last == next,
        _ => false,
    }
}

/// Drop the first record of `block` when `needs_correction` is set.
pub fn correct_for_splits(block: &TimeBlock, needs_correction: bool) -> Cow<'_, TimeBlock> {
    if !needs_correction || block.is_empty() {
        return Cow::Borrowed(block);
    }

    match block.slice(1, block.len()) {
        Ok(trimmed) => Cow::Owned(trimmed),
        Err(_) => Cow::Borrowed(block),
    }
}

/// Apply split correction across an ordered list of adjacent blocks.
///
/// Returns the corrected blocks and the number of records dropped.
pub fn stitch_blocks(blocks: &[TimeBlock]) -> (Vec<Cow<'_, TimeBlock>>, usize) {
    let mut stitched: Vec<Cow<'_, TimeBlock>> = Vec::with_capacity(blocks.len());
    let mut dropped = 0;

    for block in blocks {
        let previous = stitched.iter().rev().find(|b| !b.is_empty());
        let needs_correction = previous.is_some_and(|prev| needs_split_correction(prev, block));

        if needs_correction {
            debug!(
                time = ?block.first_time(),
                "Dropping duplicate record at block boundary"
            );
            dropped += 1;
        }
        stitched.push(correct_for_splits(block, needs_correction));
    }

    (stitched, dropped)
}
