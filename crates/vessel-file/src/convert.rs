//! Conversion between per-dataset offsets and vessel file records.
//!
//! A processed dataset keeps its lever arms and angles without saying which
//! sonar or source file they came from. The vessel file stores both next to
//! the entries, under `sonar_type` and `source`.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::{EntryData, SystemData, VesselData};

/// Entry holding the sonar model per timestamp.
pub const SONAR_TYPE_KEY: &str = "sonar_type";

/// Entry holding the source file per timestamp.
pub const SOURCE_KEY: &str = "source";

/// Vessel records split back into per-dataset parts, one element per system.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VesselXyzrph {
    pub xyzrph: Vec<SystemData>,
    pub sonar_type: Vec<EntryData>,
    pub system_identifier: Vec<String>,
    pub source: Vec<EntryData>,
}

/// Build a vessel record for one system from dataset offsets.
///
/// `sonar_type` and `source_file` are stamped at every timestamp found in
/// `xyzrph`.
pub fn convert_from_fqpr_xyzrph(
    xyzrph: &SystemData,
    sonar_type: &str,
    system_identifier: &str,
    source_file: &str,
) -> VesselData {
    let timestamps: BTreeSet<&String> = xyzrph.values().flat_map(|entry| entry.keys()).collect();
    let stamp = |value: &str| -> EntryData {
        timestamps
            .iter()
            .map(|ts| (ts.to_string(), Value::String(value.to_string())))
            .collect()
    };

    let mut system = xyzrph.clone();
    system.insert(SONAR_TYPE_KEY.to_string(), stamp(sonar_type));
    system.insert(SOURCE_KEY.to_string(), stamp(source_file));

    VesselData::from([(system_identifier.to_string(), system)])
}

/// Split vessel records into offsets, sonar types, system ids and sources.
///
/// Systems without a `sonar_type` or `source` entry get an empty map in the
/// corresponding list.
pub fn convert_from_vessel_xyzrph(vessel: &VesselData) -> VesselXyzrph {
    let mut result = VesselXyzrph::default();

    for (system_identifier, system) in vessel {
        let mut xyzrph = system.clone();
        result
            .sonar_type
            .push(xyzrph.remove(SONAR_TYPE_KEY).unwrap_or_default());
        result.source.push(xyzrph.remove(SOURCE_KEY).unwrap_or_default());
        result.system_identifier.push(system_identifier.clone());
        result.xyzrph.push(xyzrph);
    }

    result
}
