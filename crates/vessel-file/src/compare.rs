//! Comparing, merging and deduplicating system records.

use std::collections::BTreeSet;

use kluster_common::parse_timestamp_key;
use serde_json::Value;
use tracing::debug;

use crate::params::{classify, is_tpu_parameter, EntryCategory, LATENCY};
use crate::timestamps::{first_value, last_value, time_ordered, values_equal};
use crate::{EntryData, SystemData};

/// Outcome of comparing two system records.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DictComparison {
    /// Every shared lever arm entry is identical, timestamps included.
    pub identical_offsets: bool,
    /// Every shared mounting angle is identical and the first latency matches.
    pub identical_angles: bool,
    /// Every shared uncertainty entry is identical.
    pub identical_tpu: bool,
    /// Shared entries hold the same values in time order, ignoring timestamps.
    pub data_matches: bool,
    /// The second record's first waterline value, when it differs.
    pub new_waterline: Option<Value>,
}

/// Compare the entries `one` and `two` have in common.
pub fn compare_dict_data(one: &SystemData, two: &SystemData) -> DictComparison {
    let mut result = DictComparison {
        identical_offsets: true,
        identical_angles: true,
        identical_tpu: true,
        data_matches: true,
        new_waterline: None,
    };

    for (name, entry_one) in one {
        let Some(entry_two) = two.get(name) else {
            continue;
        };

        match classify(name) {
            EntryCategory::Offset => {
                result.identical_offsets &= entries_equal(entry_one, entry_two);
            }
            EntryCategory::Angle if name == LATENCY => {
                result.identical_angles &= first_values_equal(entry_one, entry_two);
            }
            EntryCategory::Angle => {
                result.identical_angles &= entries_equal(entry_one, entry_two);
            }
            EntryCategory::Tpu => {
                result.identical_tpu &= entries_equal(entry_one, entry_two);
            }
            EntryCategory::Waterline => {
                if !first_values_equal(entry_one, entry_two) {
                    result.new_waterline = first_value(entry_two).cloned();
                }
            }
            EntryCategory::Other => {}
        }

        let values_one = time_ordered(entry_one);
        let values_two = time_ordered(entry_two);
        let same_values = values_one.len() == values_two.len()
            && values_one
                .iter()
                .zip(&values_two)
                .all(|((_, a), (_, b))| values_equal(a, b));
        result.data_matches &= same_values;
    }

    result
}

/// Replace every uncertainty value in `incoming` with the latest value of the
/// same entry in `existing`.
///
/// Entries present in only one record, and all non-uncertainty entries, are
/// left alone.
pub fn carry_over_optional(existing: &SystemData, incoming: &mut SystemData) {
    for (name, entry) in incoming.iter_mut() {
        if !is_tpu_parameter(name) {
            continue;
        }
        let Some(latest) = existing.get(name).and_then(last_value) else {
            continue;
        };
        for value in entry.values_mut() {
            *value = latest.clone();
        }
        debug!(entry = %name, value = %latest, "Carried over uncertainty value");
    }
}

/// Drop every timestamp whose full set of entry values already appeared at an
/// earlier timestamp.
pub fn only_retain_earliest_entry(data: &mut SystemData) {
    let mut timestamps: Vec<String> = data
        .values()
        .flat_map(|entry| entry.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    timestamps.sort_by_key(|key| (parse_timestamp_key(key).unwrap_or(i64::MAX), key.clone()));

    let mut seen: Vec<Vec<Option<Value>>> = Vec::new();
    let mut duplicates = Vec::new();

    for timestamp in timestamps {
        let record: Vec<Option<Value>> = data.values().map(|entry| entry.get(&timestamp).cloned()).collect();
        if seen.iter().any(|prior| records_equal(prior, &record)) {
            duplicates.push(timestamp);
        } else {
            seen.push(record);
        }
    }

    for timestamp in &duplicates {
        for entry in data.values_mut() {
            entry.remove(timestamp);
        }
    }
    if !duplicates.is_empty() {
        debug!(removed = duplicates.len(), "Removed repeated vessel entries");
    }
}

fn entries_equal(a: &EntryData, b: &EntryData) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|((ka, va), (kb, vb))| ka == kb && values_equal(va, vb))
}

fn first_values_equal(a: &EntryData, b: &EntryData) -> bool {
    match (first_value(a), first_value(b)) {
        (Some(x), Some(y)) => values_equal(x, y),
        (None, None) => true,
        _ => false,
    }
}

fn records_equal(a: &[Option<Value>], b: &[Option<Value>]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => values_equal(x, y),
            (None, None) => true,
            _ => false,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn system(value: Value) -> SystemData {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_carry_over_optional() {
        let existing = system(json!({
            "roll_patch_error": {"1584426525": 0.1, "1584438532": 0.1, "1597569340": 0.1},
            "roll_sensor_error": {"1584426525": 0.0005, "1584438532": 0.0005, "1597569340": 0.0005},
            "rx_h": {"1584426525": 359.576, "1584438532": 359.576, "1597569340": 359.576}
        }));
        let mut incoming = system(json!({
            "roll_patch_error": {"1584426525": 999, "1584438532": 0.1, "1597569340": 0.1},
            "roll_sensor_error": {"1584426525": 0.0005, "1584438532": 999, "1597569340": 0.0005},
            "rx_h": {"1584426525": 359.576, "1584438532": 359.576, "1597569340": 359.576}
        }));

        carry_over_optional(&existing, &mut incoming);
        assert_eq!(incoming, existing);
        assert_eq!(incoming["roll_patch_error"]["1584426525"], json!(0.1));
    }

    #[test]
    fn test_carry_over_ignores_offsets() {
        let existing = system(json!({"rx_x": {"1234": 1.0}}));
        let mut incoming = system(json!({"rx_x": {"1234": 2.0}}));
        carry_over_optional(&existing, &mut incoming);
        assert_eq!(incoming["rx_x"]["1234"], json!(2.0));
    }

    #[test]
    fn test_only_retain_all_repeated() {
        let mut data = system(json!({
            "roll_patch_error": {"1584426525": 0.1, "1584438532": 0.1, "1597569340": 0.1},
            "roll_sensor_error": {"1584426525": 0.0005, "1584438532": 0.0005, "1597569340": 0.0005},
            "rx_h": {"1584426525": 359.576, "1584438532": 359.576, "1597569340": 359.576}
        }));
        only_retain_earliest_entry(&mut data);
        assert_eq!(
            data,
            system(json!({
                "roll_patch_error": {"1584426525": 0.1},
                "roll_sensor_error": {"1584426525": 0.0005},
                "rx_h": {"1584426525": 359.576}
            }))
        );
    }

    #[test]
    fn test_only_retain_compares_all_earlier_records() {
        let mut data = system(json!({
            "roll_patch_error": {"1584426525": 0.1, "1584438532": 0.1, "1597569340": 0.1},
            "roll_sensor_error": {"1584426525": 0.0005, "1584438532": 0.001, "1597569340": 0.0005},
            "rx_h": {"1584426525": 359.576, "1584438532": 359.576, "1597569340": 359.576}
        }));
        only_retain_earliest_entry(&mut data);
        assert_eq!(
            data,
            system(json!({
                "roll_patch_error": {"1584426525": 0.1, "1584438532": 0.1},
                "roll_sensor_error": {"1584426525": 0.0005, "1584438532": 0.001},
                "rx_h": {"1584426525": 359.576, "1584438532": 359.576}
            }))
        );
    }

    #[test]
    fn test_compare_identical() {
        let data = system(test_utils::three_timestamp_system());
        let result = compare_dict_data(&data, &data.clone());
        assert!(result.identical_offsets);
        assert!(result.identical_angles);
        assert!(result.identical_tpu);
        assert!(result.data_matches);
        assert!(result.new_waterline.is_none());
    }

    #[test]
    fn test_compare_progressive_changes() {
        let one = system(test_utils::three_timestamp_system());
        let mut two = one.clone();

        // Latency only compares its first timestamp.
        two.get_mut("latency").unwrap().insert("1584426525".into(), json!(1.0));
        let result = compare_dict_data(&one, &two);
        assert!(result.identical_offsets && !result.identical_angles && result.identical_tpu);
        assert!(!result.data_matches);
        two.get_mut("latency").unwrap().insert("1584426525".into(), json!(0.1));

        two.get_mut("roll_patch_error").unwrap().insert("1584438532".into(), json!(999));
        let result = compare_dict_data(&one, &two);
        assert!(result.identical_offsets && result.identical_angles && !result.identical_tpu);
        assert!(!result.data_matches);

        two.get_mut("rx_h").unwrap().insert("1584438532".into(), json!(999));
        let result = compare_dict_data(&one, &two);
        assert!(result.identical_offsets && !result.identical_angles && !result.identical_tpu);

        two.get_mut("rx_x").unwrap().insert("1584438532".into(), json!(999));
        let result = compare_dict_data(&one, &two);
        assert!(!result.identical_offsets && !result.identical_angles && !result.identical_tpu);
        assert!(result.new_waterline.is_none());

        two.get_mut("waterline").unwrap().insert("1584426525".into(), json!(999));
        let result = compare_dict_data(&one, &two);
        assert_eq!(result.new_waterline, Some(json!(999)));
        assert!(!result.data_matches);
    }

    #[test]
    fn test_compare_values_ignore_timestamps() {
        let one = system(json!({
            "roll_patch_error": {"999999999": 0.1, "1584438532": 0.1, "1597569340": 0.1},
            "roll_sensor_error": {"999999999": 0.0005, "1584438532": 0.0005, "1597569340": 0.0005},
            "rx_h": {"999999999": 359.576, "1584438532": 359.576, "1597569340": 359.576},
            "rx_x": {"999999999": 1.1, "1584438532": 1.2, "1597569340": 1.3}
        }));
        let two = system(json!({
            "roll_patch_error": {"1584426525": 0.1, "1584438532": 0.1, "1597569340": 0.1},
            "roll_sensor_error": {"1584426525": 0.0005, "1584438532": 0.0005, "1597569340": 0.0005},
            "rx_h": {"1584426525": 359.576, "1584438532": 359.576, "1597569340": 359.576},
            "rx_x": {"1584426525": 1.1, "1584438532": 1.2, "1597569340": 1.3}
        }));

        let result = compare_dict_data(&one, &two);
        assert!(!result.identical_offsets);
        assert!(!result.identical_angles);
        assert!(!result.identical_tpu);
        assert!(result.data_matches);
        assert!(result.new_waterline.is_none());
    }
}
