//! Merge the slices of one output chunk into a single block.

use crate::error::Result;
use crate::partition::ChunkSlice;
use crate::types::TimeBlock;

/// Concatenate the slices of one output chunk, in order.
///
/// Source order reflects time order, so slices are never reordered.
pub fn merge_constant_blocks(slices: &[ChunkSlice<'_, TimeBlock>]) -> Result<TimeBlock> {
    let parts = slices
        .iter()
        .map(|slice| slice.block.slice(slice.start, slice.end))
        .collect::<Result<Vec<_>>>()?;

    TimeBlock::concat(&parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChunkingError;

    fn arange(len: usize) -> TimeBlock {
        let values: Vec<f64> = (0..len).map(|v| v as f64).collect();
        TimeBlock::new(values.clone())
            .with_variable("tstone", values)
            .unwrap()
    }

    #[test]
    fn test_merge_constant_blocks() {
        let block = arange(100);
        let slices = [
            ChunkSlice::new(0, 3, &block),
            ChunkSlice::new(10, 13, &block),
            ChunkSlice::new(20, 23, &block),
        ];

        let merged = merge_constant_blocks(&slices).unwrap();
        assert_eq!(
            merged.variable("tstone").unwrap(),
            &[0.0, 1.0, 2.0, 10.0, 11.0, 12.0, 20.0, 21.0, 22.0]
        );
    }

    #[test]
    fn test_merge_out_of_bounds_slice() {
        let block = arange(5);
        let slices = [ChunkSlice::new(3, 8, &block)];
        assert!(matches!(
            merge_constant_blocks(&slices),
            Err(ChunkingError::SliceOutOfBounds { len: 5, .. })
        ));
    }

    #[test]
    fn test_merge_nothing() {
        assert!(merge_constant_blocks(&[]).unwrap().is_empty());
    }
}
