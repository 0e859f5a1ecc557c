//! Timestamp helpers for survey records.
//!
//! Sensor offsets and vessel configuration entries are keyed by UTC epoch
//! seconds rendered as strings (e.g. `"1626354881"`).

use chrono::{DateTime, TimeZone, Utc};

use crate::error::{CommonError, CommonResult};

/// Render epoch seconds as a timestamp key.
pub fn timestamp_key(secs: i64) -> String {
    secs.to_string()
}

/// Parse a timestamp key back to epoch seconds.
///
/// Keys written by older tooling sometimes carry a fractional part
/// (`"1626354881.0"`); those are truncated toward negative infinity.
pub fn parse_timestamp_key(key: &str) -> CommonResult<i64> {
    let trimmed = key.trim();
    if let Ok(secs) = trimmed.parse::<i64>() {
        return Ok(secs);
    }

    match trimmed.parse::<f64>() {
        Ok(secs) if secs.is_finite() => Ok(secs.floor() as i64),
        _ => Err(CommonError::InvalidTimestamp(key.to_string())),
    }
}

/// Convert epoch seconds to a UTC datetime.
pub fn timestamp_to_datetime(secs: i64) -> CommonResult<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or(CommonError::TimestampOutOfRange(secs))
}

/// Suffix used when an export folder already exists (`%Y%m%d_%H%M%S`).
pub fn folder_suffix<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    dt.format("%Y%m%d_%H%M%S").to_string()
}

/// Value stored in the export time attribute of written datasets.
pub fn export_time_attribute(dt: &DateTime<Utc>) -> String {
    dt.format("%c").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_timestamp_key_roundtrip() {
        let key = timestamp_key(1626354881);
        assert_eq!(key, "1626354881");
        assert_eq!(parse_timestamp_key(&key).unwrap(), 1626354881);
    }

    #[test]
    fn test_parse_fractional_key() {
        assert_eq!(parse_timestamp_key("1234.9").unwrap(), 1234);
        assert_eq!(parse_timestamp_key(" 1244 ").unwrap(), 1244);
    }

    #[test]
    fn test_parse_invalid_key() {
        assert!(parse_timestamp_key("em2040").is_err());
        assert!(parse_timestamp_key("").is_err());
        assert!(parse_timestamp_key("NaN").is_err());
    }

    #[test]
    fn test_timestamp_to_datetime() {
        let dt = timestamp_to_datetime(1495563079).unwrap();
        assert_eq!(dt.year(), 2017);
        assert_eq!(dt.month(), 5);
        assert_eq!(dt.day(), 23);
        assert_eq!(dt.hour(), 18);
    }

    #[test]
    fn test_folder_suffix() {
        let dt = Utc.with_ymd_and_hms(2021, 7, 15, 13, 4, 5).unwrap();
        assert_eq!(folder_suffix(&dt), "20210715_130405");
    }
}
