//! Configuration for sounding export.

use serde::{Deserialize, Serialize};

/// Soundings per chunk in the sounding dataset.
pub const DEFAULT_SOUNDING_CHUNK_SIZE: usize = 1_000_000;

/// Export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Soundings per chunk in `soundings.zarr`.
    pub sounding_chunk_size: usize,

    /// Delimiter between CSV columns.
    pub csv_delimiter: String,

    /// Drop soundings the sonar rejected.
    pub filter_by_detection: bool,

    /// Write depths positive down.
    pub z_pos_down: bool,

    /// One file per system, sector and frequency instead of one per system.
    pub export_by_identifiers: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            sounding_chunk_size: DEFAULT_SOUNDING_CHUNK_SIZE,
            csv_delimiter: " ".to_string(),
            filter_by_detection: true,
            z_pos_down: true,
            export_by_identifiers: true,
        }
    }
}

impl ExportConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("SOUNDING_CHUNK_SIZE") {
            if let Ok(size) = val.parse() {
                config.sounding_chunk_size = size;
            }
        }

        if let Ok(val) = std::env::var("CSV_DELIMITER") {
            config.csv_delimiter = val;
        }

        if let Ok(val) = std::env::var("FILTER_BY_DETECTION") {
            config.filter_by_detection = parse_bool(&val);
        }

        if let Ok(val) = std::env::var("Z_POS_DOWN") {
            config.z_pos_down = parse_bool(&val);
        }

        if let Ok(val) = std::env::var("EXPORT_BY_IDENTIFIERS") {
            config.export_by_identifiers = parse_bool(&val);
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.sounding_chunk_size == 0 {
            return Err("sounding_chunk_size must be > 0".to_string());
        }

        if self.csv_delimiter.len() != 1 {
            return Err(format!("csv_delimiter {:?} must be a single byte", self.csv_delimiter));
        }

        if self.csv_delimiter.contains(['\n', '\r', '.', '-']) {
            return Err(format!("csv_delimiter {:?} would corrupt numeric columns", self.csv_delimiter));
        }

        Ok(())
    }
}

fn parse_bool(val: &str) -> bool {
    val.to_lowercase() == "true" || val == "1"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExportConfig::default();
        assert_eq!(config.sounding_chunk_size, 1_000_000);
        assert_eq!(config.csv_delimiter, " ");
        assert!(config.filter_by_detection);
        assert!(config.z_pos_down);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ExportConfig {
            sounding_chunk_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.sounding_chunk_size = 10;
        config.csv_delimiter = String::new();
        assert!(config.validate().is_err());

        config.csv_delimiter = ".".to_string();
        assert!(config.validate().is_err());

        config.csv_delimiter = ", ".to_string();
        assert!(config.validate().is_err());

        config.csv_delimiter = "\u{00b7}".to_string();
        assert!(config.validate().is_err());

        config.csv_delimiter = ",".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_override() {
        let config: ExportConfig = serde_json::from_str(r#"{"csv_delimiter": ","}"#).unwrap();
        assert_eq!(config.csv_delimiter, ",");
        assert_eq!(config.sounding_chunk_size, DEFAULT_SOUNDING_CHUNK_SIZE);
    }
}
