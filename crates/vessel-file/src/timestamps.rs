//! Timestamp-keyed entry helpers.

use std::collections::BTreeSet;

use kluster_common::{closest_prior_key_value_within, parse_timestamp_key, timestamp_key, PRIOR_KEY_TOLERANCE_SECS};
use serde_json::Value;

use crate::EntryData;

/// Timestamps in effect during `[start, end]`.
///
/// That is every timestamp inside the range plus the latest one at or before
/// `start`. A `start` up to 60 seconds before the first timestamp still picks
/// the first timestamp. Returned as sorted timestamp keys.
pub fn get_overlapping_timestamps(timestamps: &[i64], start: i64, end: i64) -> Vec<String> {
    overlapping(timestamps, start, end)
        .into_iter()
        .map(timestamp_key)
        .collect()
}

pub(crate) fn overlapping(timestamps: &[i64], start: i64, end: i64) -> BTreeSet<i64> {
    let mut selected: BTreeSet<i64> = timestamps
        .iter()
        .copied()
        .filter(|t| (start..=end).contains(t))
        .collect();

    let keys: Vec<f64> = timestamps.iter().map(|&t| t as f64).collect();
    if let Some(prior) = closest_prior_key_value_within(&keys, start as f64, PRIOR_KEY_TOLERANCE_SECS) {
        selected.insert(prior as i64);
    }
    selected
}

/// Entry values ordered by numeric timestamp.
///
/// Keys that do not parse sort last, by their text.
pub(crate) fn time_ordered(entry: &EntryData) -> Vec<(&str, &Value)> {
    let mut ordered: Vec<(&str, &Value)> = entry.iter().map(|(k, v)| (k.as_str(), v)).collect();
    ordered.sort_by_key(|(key, _)| (parse_timestamp_key(key).unwrap_or(i64::MAX), *key));
    ordered
}

/// Value at the earliest timestamp.
pub(crate) fn first_value(entry: &EntryData) -> Option<&Value> {
    time_ordered(entry).first().map(|(_, v)| *v)
}

/// Value at the latest timestamp.
pub(crate) fn last_value(entry: &EntryData) -> Option<&Value> {
    time_ordered(entry).last().map(|(_, v)| *v)
}

/// Compare two JSON values, treating numbers by value (`1` equals `1.0`).
pub(crate) fn values_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) if a.is_number() && b.is_number() => x == y,
        _ => a == b,
    }
}
