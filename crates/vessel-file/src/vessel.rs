//! The vessel file: every system's configuration history in one JSON document.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use kluster_common::parse_timestamp_key;
use tracing::{debug, info, warn};

use crate::compare::carry_over_optional;
use crate::error::{Result, VesselFileError};
use crate::timestamps::overlapping;
use crate::{EntryData, SystemData, VesselData};

/// Vessel configuration, optionally backed by a file on disk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VesselFile {
    /// Records keyed by system identifier.
    pub data: VesselData,
    source_file: Option<PathBuf>,
}

impl VesselFile {
    /// An empty, in-memory vessel file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a vessel file from disk.
    ///
    /// Every timestamp key must parse as epoch seconds.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(VesselFileError::NotFound(path.to_path_buf()));
        }

        let reader = BufReader::new(File::open(path)?);
        let data: VesselData = serde_json::from_reader(reader)?;
        validate_timestamps(&data)?;

        debug!(path = %path.display(), systems = data.len(), "Opened vessel file");
        Ok(Self {
            data,
            source_file: Some(path.to_path_buf()),
        })
    }

    /// Path the file was last opened from or saved to.
    pub fn source_file(&self) -> Option<&Path> {
        self.source_file.as_deref()
    }

    /// System identifiers in the file.
    pub fn systems(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    /// Every entry recorded for `system`.
    pub fn system(&self, system: &str) -> Result<&SystemData> {
        self.data
            .get(system)
            .ok_or_else(|| VesselFileError::UnknownSystem(system.to_string()))
    }

    /// Merge `data` into the record for `system`.
    ///
    /// A new system is inserted as-is. For an existing system, incoming
    /// values replace existing values at the same timestamp; with
    /// `carry_over_tpu`, incoming uncertainty values are first replaced by
    /// the latest existing value of the same entry.
    pub fn update(&mut self, system: &str, mut data: SystemData, carry_over_tpu: bool) {
        let Some(existing) = self.data.get_mut(system) else {
            debug!(system = %system, entries = data.len(), "Adding system");
            self.data.insert(system.to_string(), data);
            return;
        };

        if carry_over_tpu {
            carry_over_optional(existing, &mut data);
        }
        for (name, entry) in data {
            existing.entry(name).or_default().extend(entry);
        }
        debug!(system = %system, "Updated system");
    }

    /// Entries of `system` in effect during `[start, end]`.
    ///
    /// Each entry keeps the timestamps inside the range plus the one in effect
    /// at `start`. Returns `None` for an unknown system or when no entry has a
    /// timestamp in effect.
    pub fn return_data(&self, system: &str, start: i64, end: i64) -> Option<SystemData> {
        let entries = self.data.get(system)?;
        let mut result = SystemData::new();

        for (name, entry) in entries {
            let stamped: Vec<(i64, &String)> = entry
                .keys()
                .filter_map(|key| match parse_timestamp_key(key) {
                    Ok(ts) => Some((ts, key)),
                    Err(e) => {
                        warn!(system = %system, entry = %name, error = %e, "Skipping timestamp");
                        None
                    }
                })
                .collect();
            let timestamps: Vec<i64> = stamped.iter().map(|(ts, _)| *ts).collect();
            let wanted = overlapping(&timestamps, start, end);

            let selected: EntryData = stamped
                .iter()
                .filter(|(ts, _)| wanted.contains(ts))
                .map(|(_, key)| ((*key).clone(), entry[*key].clone()))
                .collect();
            if !selected.is_empty() {
                result.insert(name.clone(), selected);
            }
        }

        if result.is_empty() {
            None
        } else {
            Some(result)
        }
    }

    /// Write the file as JSON to `path` and remember it as the source.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &self.data)?;
        writer.flush()?;

        info!(path = %path.display(), systems = self.data.len(), "Saved vessel file");
        self.source_file = Some(path.to_path_buf());
        Ok(())
    }
}

/// Create an empty vessel file at `path`, replacing any existing file.
pub fn create_new_vessel_file(path: impl AsRef<Path>) -> Result<VesselFile> {
    let mut vessel = VesselFile::new();
    vessel.save(path)?;
    Ok(vessel)
}

fn validate_timestamps(data: &VesselData) -> Result<()> {
    for (system, entries) in data {
        for (entry, values) in entries {
            for key in values.keys() {
                parse_timestamp_key(key).map_err(|source| VesselFileError::InvalidTimestamp {
                    system: system.clone(),
                    entry: entry.clone(),
                    source,
                })?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn system(value: serde_json::Value) -> SystemData {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_return_single_timestamp() {
        let mut vf = VesselFile::new();
        vf.update(
            "123",
            system(json!({"beam_opening_angle": {"1234": 1.0}, "rx_x": {"1234": 0.345}})),
            true,
        );
        let expected = system(json!({"beam_opening_angle": {"1234": 1.0}, "rx_x": {"1234": 0.345}}));

        assert_eq!(vf.return_data("123", 1239, 1250), Some(expected.clone()));
        assert_eq!(vf.return_data("123", 1230, 1235), Some(expected.clone()));
        assert_eq!(vf.return_data("123", 1000, 1100), None);
        assert_eq!(vf.return_data("123", 1300, 1400), Some(expected));
        assert_eq!(vf.return_data("999", 1300, 1400), None);
    }

    #[test]
    fn test_system_lookup() {
        let vf = VesselFile::new();
        assert!(matches!(vf.system("123"), Err(VesselFileError::UnknownSystem(_))));
        assert!(vf.source_file().is_none());
    }
}
