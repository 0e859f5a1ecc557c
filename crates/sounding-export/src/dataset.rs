//! Georeferenced ping datasets and their flattened sounding form.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};

/// Detection info value the sonar assigns to rejected soundings.
pub const REJECTED_DETECTION: i32 = 2;

/// One system's georeferenced pings, stored as time x beam grids in
/// row-major (ping-major) order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PingDataset {
    /// Serial number (or serial number and head) of the sonar.
    pub system_identifier: String,
    /// Ping times, UTC epoch seconds.
    pub time: Vec<f64>,
    /// Beams per ping.
    pub beams: usize,
    /// Easting per sounding; NaN where a beam was not georeferenced.
    pub x: Vec<f64>,
    /// Northing per sounding.
    pub y: Vec<f64>,
    /// Depth per sounding, positive down.
    pub z: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tvu: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thu: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detectioninfo: Option<Vec<i32>>,
    /// Transmit frequency per sounding (Hz).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Vec<i64>>,
    /// Transmit sector per sounding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txsector_beam: Option<Vec<i32>>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl PingDataset {
    /// Number of soundings (pings x beams).
    pub fn sounding_count(&self) -> usize {
        self.time.len() * self.beams
    }

    /// Soundings with a georeferenced position.
    pub fn valid_sounding_count(&self) -> usize {
        self.x.iter().filter(|v| !v.is_nan()).count()
    }

    /// Check every grid holds one value per sounding.
    pub fn validate(&self) -> Result<()> {
        let expected = self.sounding_count();
        let lengths = [
            ("x", Some(self.x.len())),
            ("y", Some(self.y.len())),
            ("z", Some(self.z.len())),
            ("tvu", self.tvu.as_ref().map(Vec::len)),
            ("thu", self.thu.as_ref().map(Vec::len)),
            ("detectioninfo", self.detectioninfo.as_ref().map(Vec::len)),
            ("frequency", self.frequency.as_ref().map(Vec::len)),
            ("txsector_beam", self.txsector_beam.as_ref().map(Vec::len)),
        ];

        for (variable, len) in lengths {
            if let Some(actual) = len {
                if actual != expected {
                    return Err(ExportError::ShapeMismatch {
                        system: self.system_identifier.clone(),
                        variable: variable.to_string(),
                        expected,
                        actual,
                    });
                }
            }
        }
        Ok(())
    }

    /// Flatten the time x beam grids into one sounding dimension.
    pub fn stack(&self) -> Result<Soundings> {
        self.validate()?;

        let mut time = Vec::with_capacity(self.sounding_count());
        let mut beam = Vec::with_capacity(self.sounding_count());
        for &t in &self.time {
            for b in 0..self.beams {
                time.push(t);
                beam.push(b as u32);
            }
        }

        Ok(Soundings {
            system_identifier: self.system_identifier.clone(),
            time,
            beam,
            x: self.x.clone(),
            y: self.y.clone(),
            z: self.z.clone(),
            tvu: self.tvu.clone(),
            thu: self.thu.clone(),
            detectioninfo: self.detectioninfo.clone(),
            frequency: self.frequency.clone(),
            txsector_beam: self.txsector_beam.clone(),
        })
    }
}

/// Soundings in time-major order with their ping time and beam index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Soundings {
    pub system_identifier: String,
    pub time: Vec<f64>,
    pub beam: Vec<u32>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    pub tvu: Option<Vec<f64>>,
    pub thu: Option<Vec<f64>>,
    pub detectioninfo: Option<Vec<i32>>,
    pub frequency: Option<Vec<i64>>,
    pub txsector_beam: Option<Vec<i32>>,
}

impl Soundings {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Keep the soundings where `mask` is true.
    pub fn select(&self, mask: &[bool]) -> Soundings {
        Soundings {
            system_identifier: self.system_identifier.clone(),
            time: select(&self.time, mask),
            beam: select(&self.beam, mask),
            x: select(&self.x, mask),
            y: select(&self.y, mask),
            z: select(&self.z, mask),
            tvu: self.tvu.as_deref().map(|v| select(v, mask)),
            thu: self.thu.as_deref().map(|v| select(v, mask)),
            detectioninfo: self.detectioninfo.as_deref().map(|v| select(v, mask)),
            frequency: self.frequency.as_deref().map(|v| select(v, mask)),
            txsector_beam: self.txsector_beam.as_deref().map(|v| select(v, mask)),
        }
    }

    /// Mask of soundings with a georeferenced position.
    pub fn position_mask(&self) -> Vec<bool> {
        self.x.iter().map(|v| !v.is_nan()).collect()
    }
}

/// Keep `values[i]` where `mask[i]` is true.
pub fn select<T: Copy>(values: &[T], mask: &[bool]) -> Vec<T> {
    values
        .iter()
        .zip(mask)
        .filter_map(|(v, keep)| keep.then_some(*v))
        .collect()
}

/// Distinct values in ascending order.
pub fn unique_sorted<T: Copy + Ord>(values: &[T]) -> Vec<T> {
    let mut unique = values.to_vec();
    unique.sort_unstable();
    unique.dedup();
    unique
}
