//! Serial-number masks and bit tests for raw record fields.

use std::collections::BTreeMap;

use crate::error::{ChunkingError, Result};

/// Record indices grouped by sonar serial number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialMask {
    /// Unique serial numbers, ascending, as strings.
    pub serial_numbers: Vec<String>,
    /// Indices of the records for each entry of `serial_numbers`.
    pub indices: Vec<Vec<usize>>,
}

/// Group record indices by serial number.
///
/// Dual-head systems interleave pings from both heads; the mask separates them.
pub fn build_serial_mask(serial_numbers: &[u64]) -> SerialMask {
    let mut groups: BTreeMap<u64, Vec<usize>> = BTreeMap::new();
    for (index, &serial) in serial_numbers.iter().enumerate() {
        groups.entry(serial).or_default().push(index);
    }

    let (serial_numbers, indices) = groups
        .into_iter()
        .map(|(serial, idx)| (serial.to_string(), idx))
        .unzip();

    SerialMask {
        serial_numbers,
        indices,
    }
}

/// Test the 1-based `bit` of each value.
pub fn is_bit_set(values: &[i64], bit: u32) -> Result<Vec<bool>> {
    if bit == 0 || bit > i64::BITS {
        return Err(ChunkingError::InvalidArgument(format!(
            "bit number {} outside 1..={}",
            bit,
            i64::BITS
        )));
    }

    let mask = 1i64 << (bit - 1);
    Ok(values.iter().map(|v| v & mask != 0).collect())
}
