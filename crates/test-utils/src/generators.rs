//! Synthetic record generators.
//!
//! These generators create predictable, verifiable data patterns that can be
//! used across the test suite.

/// Evenly spaced times `start, start + step, ...` with `len` entries.
///
/// # Example
///
/// ```
/// use test_utils::time_axis;
///
/// assert_eq!(time_axis(10.0, 0.5, 3), vec![10.0, 10.5, 11.0]);
/// ```
pub fn time_axis(start: f64, step: f64, len: usize) -> Vec<f64> {
    (0..len).map(|i| start + step * i as f64).collect()
}

/// Split one continuous time axis into consecutive blocks of `lengths`.
///
/// Block `n + 1` starts one `step` after the last time of block `n`, which is
/// what a multibeam file sequence without overlap looks like.
///
/// # Example
///
/// ```
/// use test_utils::split_time_axis;
///
/// let blocks = split_time_axis(&[2, 3], 0.0, 1.0);
/// assert_eq!(blocks, vec![vec![0.0, 1.0], vec![2.0, 3.0, 4.0]]);
/// ```
pub fn split_time_axis(lengths: &[usize], start: f64, step: f64) -> Vec<Vec<f64>> {
    let mut offset = 0;
    lengths
        .iter()
        .map(|&len| {
            let block = time_axis(start + step * offset as f64, step, len);
            offset += len;
            block
        })
        .collect()
}

/// Like [`split_time_axis`], but every block after the first repeats the
/// previous block's last record, as happens when a logger splits a file
/// mid-ping.
///
/// # Example
///
/// ```
/// use test_utils::split_time_axis_with_overlap;
///
/// let blocks = split_time_axis_with_overlap(&[3, 3], 0.0, 1.0);
/// assert_eq!(blocks, vec![vec![0.0, 1.0, 2.0], vec![2.0, 3.0, 4.0]]);
/// ```
pub fn split_time_axis_with_overlap(lengths: &[usize], start: f64, step: f64) -> Vec<Vec<f64>> {
    let mut next = start;
    lengths
        .iter()
        .enumerate()
        .map(|(i, &len)| {
            let first = if i == 0 || len == 0 { next } else { next - step };
            let block = time_axis(first, step, len);
            if let Some(last) = block.last() {
                next = last + step;
            }
            block
        })
        .collect()
}

/// Creates a ping-by-beam grid with predictable values.
///
/// Each cell value is `ping * 1000 + beam`, row-major by ping.
///
/// # Example
///
/// ```
/// use test_utils::create_beam_grid;
///
/// let grid = create_beam_grid(2, 3);
/// assert_eq!(grid, vec![0.0, 1.0, 2.0, 1000.0, 1001.0, 1002.0]);
/// ```
pub fn create_beam_grid(pings: usize, beams: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(pings * beams);
    for ping in 0..pings {
        for beam in 0..beams {
            data.push((ping * 1000 + beam) as f64);
        }
    }
    data
}

/// Depths for a flat seafloor with a small across-track slope.
///
/// Values are positive down, between `depth` and `depth + 0.01 * beams`.
pub fn create_depth_grid(pings: usize, beams: usize, depth: f64) -> Vec<f64> {
    let mut data = Vec::with_capacity(pings * beams);
    for _ in 0..pings {
        for beam in 0..beams {
            data.push(depth + 0.01 * beam as f64);
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_time_axis_is_continuous() {
        let blocks = split_time_axis(&[33, 33, 34], 100.0, 0.5);
        let flat: Vec<f64> = blocks.concat();
        assert_eq!(flat, time_axis(100.0, 0.5, 100));
    }

    #[test]
    fn test_overlap_repeats_previous_last() {
        let blocks = split_time_axis_with_overlap(&[4, 4, 4], 0.0, 1.0);
        assert_eq!(blocks[1][0], *blocks[0].last().unwrap());
        assert_eq!(blocks[2][0], *blocks[1].last().unwrap());
        assert_eq!(*blocks[2].last().unwrap(), 9.0);
    }

    #[test]
    fn test_depth_grid() {
        let grid = create_depth_grid(3, 4, 20.0);
        assert_eq!(grid.len(), 12);
        assert!(grid.iter().all(|&d| (20.0..20.04).contains(&d)));
    }
}
