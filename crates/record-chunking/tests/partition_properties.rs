//! Partitioning and rechunking properties over generated block layouts.

use record_chunking::{
    chunk_len, constant_blocks, constant_time_blocks, merge_constant_blocks, rechunk, TimeBlock,
};
use test_utils::{split_time_axis, split_time_axis_with_overlap, time_axis};

const LAYOUTS: &[&[usize]] = &[
    &[33, 33, 34],
    &[1],
    &[7, 0, 7],
    &[100],
    &[3, 3, 3, 3, 3, 3, 3],
    &[250, 1, 1, 249],
];

const CHUNK_SIZES: &[usize] = &[1, 3, 10, 64, 1000];

fn blocks_from(lengths: &[usize], overlap: bool) -> Vec<TimeBlock> {
    let times = if overlap {
        split_time_axis_with_overlap(lengths, 0.0, 1.0)
    } else {
        split_time_axis(lengths, 0.0, 1.0)
    };

    times
        .into_iter()
        .map(|time| {
            let depth: Vec<f64> = time.iter().map(|t| 20.0 + t * 0.1).collect();
            TimeBlock::new(time)
                .with_variable("depth", depth)
                .expect("Failed to build block")
        })
        .collect()
}

#[test]
fn test_descriptor_lengths_sum_to_total() {
    for lengths in LAYOUTS {
        let blocks = blocks_from(lengths, false);
        for &chunk_size in CHUNK_SIZES {
            let (chunks, total) = constant_time_blocks(&blocks, chunk_size).expect("Failed to partition");

            let covered: usize = chunks.iter().map(|c| chunk_len(c)).sum();
            assert_eq!(covered, total, "layout {:?} chunk {}", lengths, chunk_size);
            assert_eq!(total, lengths.iter().sum::<usize>());
            assert_eq!(chunks.len(), total.div_ceil(chunk_size));
        }
    }
}

#[test]
fn test_only_last_chunk_is_short() {
    for lengths in LAYOUTS {
        let blocks = blocks_from(lengths, false);
        for &chunk_size in CHUNK_SIZES {
            let (chunks, _) = constant_time_blocks(&blocks, chunk_size).expect("Failed to partition");

            if let Some((last, full)) = chunks.split_last() {
                assert!(full.iter().all(|c| chunk_len(c) == chunk_size));
                assert!(chunk_len(last) <= chunk_size && chunk_len(last) > 0);
            }
            assert!(chunks.iter().flatten().all(|s| !s.is_empty()));
        }
    }
}

#[test]
fn test_merged_chunks_reproduce_input_order() {
    for lengths in LAYOUTS {
        let blocks = blocks_from(lengths, false);
        let (chunks, total) = constant_time_blocks(&blocks, 10).expect("Failed to partition");

        let times: Vec<f64> = chunks
            .iter()
            .map(|c| merge_constant_blocks(c).expect("Failed to merge"))
            .flat_map(|b| b.time().to_vec())
            .collect();
        assert_eq!(times, time_axis(0.0, 1.0, total));
    }
}

#[test]
fn test_generic_blocks_use_given_lengths() {
    let names = ["file_a.all", "file_b.all"];
    let (chunks, total) = constant_blocks(&[5, 5], &names, 4).expect("Failed to partition");

    assert_eq!(total, 10);
    assert_eq!(*chunks[1][0].block, "file_a.all");
    assert_eq!((chunks[1][1].start, chunks[1][1].end), (0, 3));
    assert_eq!(*chunks[1][1].block, "file_b.all");
}

#[test]
fn test_rechunk_overlapping_files() {
    for lengths in LAYOUTS {
        let blocks = blocks_from(lengths, true);
        let non_empty = lengths.iter().filter(|&&l| l > 0).count();

        let result = rechunk(&blocks, 10).expect("Failed to rechunk");
        let source: usize = lengths.iter().sum();

        assert_eq!(result.summary.source_records, source);
        assert_eq!(result.summary.dropped_duplicates, non_empty.saturating_sub(1));
        assert_eq!(
            result.summary.output_records,
            source - result.summary.dropped_duplicates
        );

        let times: Vec<f64> = result.chunks.iter().flat_map(|c| c.time().to_vec()).collect();
        assert!(times.windows(2).all(|w| w[0] < w[1]), "layout {:?}", lengths);

        let depth: Vec<f64> = result
            .chunks
            .iter()
            .flat_map(|c| c.variable("depth").unwrap().to_vec())
            .collect();
        let expected: Vec<f64> = times.iter().map(|t| 20.0 + t * 0.1).collect();
        assert_eq!(depth, expected);
    }
}
