//! Point file export.
//!
//! One file per system, or per system/sector/frequency combination, written
//! into a fresh export folder next to the converted data.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

use chrono::Local;
use kluster_common::folder_suffix;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ExportConfig;
use crate::dataset::{unique_sorted, PingDataset};
use crate::error::{ExportError, Result};
use crate::filter::{frequency_mask, generate_export_data, sector_mask, ExportData};

/// Point file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Las,
    Entwine,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Las => "las",
            ExportFormat::Entwine => "entwine",
        }
    }

    /// Name of the folder created for this format.
    pub fn folder_name(&self) -> String {
        format!("{}_export", self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "las" => Ok(ExportFormat::Las),
            "entwine" => Ok(ExportFormat::Entwine),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Write every dataset's soundings as point files under `output_directory`.
///
/// Returns the written paths in write order.
pub fn export_pings_to_file(
    datasets: &[PingDataset],
    output_directory: &Path,
    format: ExportFormat,
    config: &ExportConfig,
) -> Result<Vec<PathBuf>> {
    let first = datasets.first().ok_or(ExportError::NoData)?;
    if first.x.is_empty() {
        return Err(ExportError::missing(&first.system_identifier, "x"));
    }
    if format != ExportFormat::Csv {
        return Err(ExportError::UnsupportedFormat(format.to_string()));
    }

    let delimiter = delimiter_byte(&config.csv_delimiter)?;

    info!(format = %format, "Exporting xyz data");
    let start = Instant::now();

    let folder = create_folder(output_directory, &format.folder_name())?;
    let written = export_pings_to_csv(datasets, &folder, delimiter, config)?;

    info!(
        files = written.len(),
        elapsed_secs = start.elapsed().as_secs_f64(),
        "Exporting xyz data to csv complete"
    );
    Ok(written)
}

fn export_pings_to_csv(
    datasets: &[PingDataset],
    folder: &Path,
    delimiter: u8,
    config: &ExportConfig,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    for dataset in datasets {
        let system = &dataset.system_identifier;
        info!(system = %system, "Operating on system");
        if config.filter_by_detection && dataset.detectioninfo.is_none() {
            return Err(ExportError::DetectionInfoRequired(system.clone()));
        }

        let soundings = dataset.stack()?;

        if !config.export_by_identifiers {
            let dest = folder.join(format!("{}.csv", system));
            let data = generate_export_data(&soundings, config.filter_by_detection, config.z_pos_down);
            csv_write(&data, &dest, delimiter)?;
            written.push(dest);
            continue;
        }

        let frequency = soundings
            .frequency
            .as_deref()
            .ok_or_else(|| ExportError::missing(system, "frequency"))?;
        for freq in unique_sorted(frequency) {
            let by_freq = soundings.select(&frequency_mask(frequency, freq));
            let sectors = by_freq
                .txsector_beam
                .as_deref()
                .ok_or_else(|| ExportError::missing(system, "txsector_beam"))?;

            for sector in unique_sorted(sectors) {
                let subset = by_freq.select(&sector_mask(sectors, sector));
                let dest = folder.join(format!("{}_{}_{}.csv", system, sector, freq));
                let data = generate_export_data(&subset, config.filter_by_detection, config.z_pos_down);
                csv_write(&data, &dest, delimiter)?;
                written.push(dest);
            }
        }
    }

    Ok(written)
}

/// The single byte used to separate columns.
pub fn delimiter_byte(delimiter: &str) -> Result<u8> {
    match delimiter.as_bytes() {
        [byte] => Ok(*byte),
        _ => Err(ExportError::InvalidDelimiter(delimiter.to_string())),
    }
}

/// Write `data` as delimited text with a header row.
///
/// Columns are easting, northing, depth and, when present, uncertainty, each
/// with three decimals.
pub fn csv_write(data: &ExportData, dest: &Path, delimiter: u8) -> Result<()> {
    debug!(path = %dest.display(), soundings = data.len(), "Writing csv");
    let mut writer = csv::WriterBuilder::new().delimiter(delimiter).from_path(dest)?;

    match &data.uncertainty {
        Some(unc) => {
            writer.write_record(["easting", "northing", "depth", "uncertainty"])?;
            for i in 0..data.len() {
                writer.write_record(&[
                    format!("{:.3}", data.x[i]),
                    format!("{:.3}", data.y[i]),
                    format!("{:.3}", data.z[i]),
                    format!("{:.3}", unc[i]),
                ])?;
            }
        }
        None => {
            writer.write_record(["easting", "northing", "depth"])?;
            for i in 0..data.len() {
                writer.write_record(&[
                    format!("{:.3}", data.x[i]),
                    format!("{:.3}", data.y[i]),
                    format!("{:.3}", data.z[i]),
                ])?;
            }
        }
    }

    writer.flush()?;
    Ok(())
}

/// Create `output_directory/name`, or `name_<YYYYmmdd_HHMMSS>` when it exists.
pub fn create_folder(output_directory: &Path, name: &str) -> Result<PathBuf> {
    let path = output_directory.join(name);
    match fs::create_dir(&path) {
        Ok(()) => Ok(path),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            let suffixed = output_directory.join(format!("{}_{}", name, folder_suffix(&Local::now())));
            fs::create_dir(&suffixed)?;
            Ok(suffixed)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("las".parse::<ExportFormat>().unwrap(), ExportFormat::Las);
        assert!(matches!(
            "shapefile".parse::<ExportFormat>(),
            Err(ExportError::InvalidFormat(_))
        ));
        assert_eq!(ExportFormat::Entwine.folder_name(), "entwine_export");
    }

    #[test]
    fn test_csv_write_with_uncertainty() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.csv");
        let data = ExportData {
            x: vec![538888.1234, 538889.5],
            y: vec![5292234.0, 5292235.25],
            z: vec![20.1, -3.0],
            uncertainty: Some(vec![0.25, 0.5]),
            ..Default::default()
        };

        csv_write(&data, &dest, b',').unwrap();
        let text = fs::read_to_string(&dest).unwrap();
        assert_eq!(
            text,
            "easting,northing,depth,uncertainty\n\
             538888.123,5292234.000,20.100,0.250\n\
             538889.500,5292235.250,-3.000,0.500\n"
        );
    }

    #[test]
    fn test_csv_write_without_uncertainty() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.csv");
        let data = ExportData {
            x: vec![1.0],
            y: vec![2.0],
            z: vec![3.0],
            ..Default::default()
        };

        csv_write(&data, &dest, b' ').unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "easting northing depth\n1.000 2.000 3.000\n");
    }

    #[test]
    fn test_delimiter_byte() {
        assert_eq!(delimiter_byte(",").unwrap(), b',');
        assert_eq!(delimiter_byte("\t").unwrap(), b'\t');
        assert!(matches!(delimiter_byte(""), Err(ExportError::InvalidDelimiter(_))));
        assert!(matches!(delimiter_byte(", "), Err(ExportError::InvalidDelimiter(_))));
        assert!(matches!(delimiter_byte("é"), Err(ExportError::InvalidDelimiter(_))));
    }

    #[test]
    fn test_create_folder_suffixes_existing() {
        let dir = tempfile::tempdir().unwrap();
        let first = create_folder(dir.path(), "csv_export").unwrap();
        assert_eq!(first, dir.path().join("csv_export"));

        let second = create_folder(dir.path(), "csv_export").unwrap();
        let name = second.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("csv_export_"));
        assert_eq!(name.len(), "csv_export_".len() + "YYYYmmdd_HHMMSS".len());
        assert!(second.is_dir());
    }
}
