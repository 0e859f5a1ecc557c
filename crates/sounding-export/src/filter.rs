//! Build the arrays written by the exporters.

use tracing::info;

use crate::dataset::{Soundings, REJECTED_DETECTION};

/// Soundings ready to write.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExportData {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    /// Vertical uncertainty, when the dataset carries `tvu`.
    pub uncertainty: Option<Vec<f64>>,
    /// Detection info of each written sounding.
    pub classification: Option<Vec<i32>>,
    /// Over the georeferenced soundings: true where the detection was accepted.
    pub valid_detections: Option<Vec<bool>>,
    /// Over all input soundings: true where `x` is not NaN.
    pub nan_mask: Vec<bool>,
}

impl ExportData {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn uncertainty_included(&self) -> bool {
        self.uncertainty.is_some()
    }
}

/// Drop soundings without a position, optionally drop rejected detections,
/// and flip `z` to positive up when `z_pos_down` is false.
pub fn generate_export_data(soundings: &Soundings, filter_by_detection: bool, z_pos_down: bool) -> ExportData {
    let nan_mask = soundings.position_mask();
    let positioned = soundings.select(&nan_mask);

    let valid_detections: Option<Vec<bool>> = positioned
        .detectioninfo
        .as_ref()
        .map(|info| info.iter().map(|&d| d != REJECTED_DETECTION).collect());

    if let Some(valid) = &valid_detections {
        let total = valid.len();
        let retained = valid.iter().filter(|&&v| v).count();
        info!(
            system = %soundings.system_identifier,
            total,
            retained,
            filtered = total - retained,
            "Detection filter"
        );
    }

    let written = match (&valid_detections, filter_by_detection) {
        (Some(valid), true) => positioned.select(valid),
        _ => positioned,
    };

    let mut z = written.z;
    if !z_pos_down {
        z.iter_mut().for_each(|v| *v = -*v);
    }

    ExportData {
        x: written.x,
        y: written.y,
        z,
        uncertainty: written.tvu,
        classification: written.detectioninfo,
        valid_detections,
        nan_mask,
    }
}

/// Mask of soundings at `want` frequency.
pub fn frequency_mask(frequency: &[i64], want: i64) -> Vec<bool> {
    frequency.iter().map(|&f| f == want).collect()
}

/// Mask of soundings from transmit sector `want`.
pub fn sector_mask(sector: &[i32], want: i32) -> Vec<bool> {
    sector.iter().map(|&s| s == want).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn soundings() -> Soundings {
        Soundings {
            system_identifier: "40111".to_string(),
            time: vec![0.0; 5],
            beam: vec![0, 1, 2, 3, 4],
            x: vec![1.0, f64::NAN, 3.0, 4.0, 5.0],
            y: vec![11.0, 12.0, 13.0, 14.0, 15.0],
            z: vec![21.0, 22.0, 23.0, 24.0, 25.0],
            tvu: Some(vec![0.1, 0.2, 0.3, 0.4, 0.5]),
            detectioninfo: Some(vec![0, 0, 2, 1, 2]),
            ..Default::default()
        }
    }

    #[test]
    fn test_filter_by_detection() {
        let data = generate_export_data(&soundings(), true, true);
        assert_eq!(data.x, [1.0, 4.0]);
        assert_eq!(data.z, [21.0, 24.0]);
        assert_eq!(data.uncertainty, Some(vec![0.1, 0.4]));
        assert_eq!(data.classification, Some(vec![0, 1]));
        assert_eq!(data.valid_detections, Some(vec![true, false, true, false]));
        assert_eq!(data.nan_mask, [true, false, true, true, true]);
    }

    #[test]
    fn test_no_filter_keeps_rejected() {
        let data = generate_export_data(&soundings(), false, true);
        assert_eq!(data.x, [1.0, 3.0, 4.0, 5.0]);
        assert_eq!(data.classification, Some(vec![0, 2, 1, 2]));
    }

    #[test]
    fn test_positive_up() {
        let data = generate_export_data(&soundings(), true, false);
        assert_eq!(data.z, [-21.0, -24.0]);
    }

    #[test]
    fn test_without_detection_info() {
        let mut input = soundings();
        input.detectioninfo = None;
        input.tvu = None;

        let data = generate_export_data(&input, true, true);
        assert_eq!(data.len(), 4);
        assert!(data.valid_detections.is_none());
        assert!(!data.uncertainty_included());
    }

    #[test]
    fn test_identifier_masks() {
        assert_eq!(frequency_mask(&[200, 300, 200], 200), [true, false, true]);
        assert_eq!(sector_mask(&[0, 1, 0], 1), [false, true, false]);
    }
}
