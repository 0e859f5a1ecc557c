//! Common test fixtures for vessel configuration tests.
//!
//! Values are returned as `serde_json::Value` so callers can deserialize them
//! into whatever map type they work with.

use serde_json::{json, Value};

/// Timestamp shared by every entry of [`sample_xyzrph`].
pub const SAMPLE_XYZRPH_TIMESTAMP: &str = "1626354881";

/// Lever arms, mounting angles and waterline for a dual-head system, one
/// timestamp per entry. Values are strings, as written by sonar readers.
pub fn sample_xyzrph() -> Value {
    let entries = [
        ("antenna_x", "0.000"),
        ("antenna_y", "0.000"),
        ("antenna_z", "0.000"),
        ("imu_h", "0.000"),
        ("latency", "0.000"),
        ("imu_p", "0.000"),
        ("imu_r", "0.000"),
        ("imu_x", "0.000"),
        ("imu_y", "0.000"),
        ("imu_z", "0.000"),
        ("rx_r", "0.030"),
        ("rx_p", "0.124"),
        ("rx_h", "0.087"),
        ("rx_x", "1.234"),
        ("rx_y", "0.987"),
        ("rx_z", "0.543"),
        ("rx_x_0", "0.204"),
        ("rx_x_1", "0.204"),
        ("rx_x_2", "0.204"),
        ("rx_y_0", "0.0"),
        ("rx_y_1", "0.0"),
        ("rx_y_2", "0.0"),
        ("rx_z_0", "-0.0315"),
        ("rx_z_1", "-0.0315"),
        ("rx_z_2", "-0.0315"),
        ("tx_r", "0.090"),
        ("tx_p", "-0.123"),
        ("tx_h", "-0.050"),
        ("tx_x", "1.540"),
        ("tx_y", "-0.987"),
        ("tx_z", "1.535"),
        ("tx_x_0", "0.002"),
        ("tx_x_1", "0.002"),
        ("tx_x_2", "0.002"),
        ("tx_y_0", "-0.1042"),
        ("tx_y_1", "0.0"),
        ("tx_y_2", "0.1042"),
        ("tx_z_0", "-0.0149"),
        ("tx_z_1", "-0.006"),
        ("tx_z_2", "-0.0149"),
        ("waterline", "0.200"),
    ];

    let map: serde_json::Map<String, Value> = entries
        .iter()
        .map(|(name, value)| {
            let mut entry = serde_json::Map::new();
            entry.insert(SAMPLE_XYZRPH_TIMESTAMP.to_string(), json!(value));
            (name.to_string(), Value::Object(entry))
        })
        .collect();
    Value::Object(map)
}

/// One system's entries over three timestamps, covering every entry
/// category: latency, tpu, angle, offset and waterline.
pub fn three_timestamp_system() -> Value {
    json!({
        "latency": {"1584426525": 0.1, "1584438532": 0.1, "1597569340": 0.1},
        "roll_patch_error": {"1584426525": 0.1, "1584438532": 0.1, "1597569340": 0.1},
        "roll_sensor_error": {"1584426525": 0.0005, "1584438532": 0.0005, "1597569340": 0.0005},
        "rx_h": {"1584426525": 359.576, "1584438532": 359.576, "1597569340": 359.576},
        "rx_x": {"1584426525": 1.1, "1584438532": 1.2, "1597569340": 1.3},
        "waterline": {"1584426525": 1.1, "1584438532": 1.2, "1597569340": 1.3}
    })
}

/// Entries for a system installed at three times, keyed by system id.
pub fn sample_vessel_update() -> (&'static str, Value) {
    (
        "123",
        json!({
            "beam_opening_angle": {"1234": 1.0, "1244": 1.5, "1254": 2.0},
            "rx_x": {"1234": 0.345, "1244": 0.456, "1254": 0.789}
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_xyzrph_single_timestamp() {
        let xyzrph = sample_xyzrph();
        let map = xyzrph.as_object().unwrap();
        assert_eq!(map.len(), 41);
        assert!(map
            .values()
            .all(|entry| entry.as_object().unwrap().contains_key(SAMPLE_XYZRPH_TIMESTAMP)));
        assert_eq!(map["waterline"][SAMPLE_XYZRPH_TIMESTAMP], "0.200");
    }

    #[test]
    fn test_three_timestamp_system() {
        let system = three_timestamp_system();
        assert_eq!(system.as_object().unwrap().len(), 6);
        assert_eq!(system["rx_x"]["1597569340"], 1.3);
    }
}
