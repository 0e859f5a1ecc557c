//! Entry names and their categories.
//!
//! Entry names follow the `<sensor>[_<qualifier>]_<component>[_<index>]`
//! pattern, e.g. `rx_x`, `tx_z_2` or `rx_port_h`. Components `x`, `y` and `z`
//! are lever arms; `r`, `p` and `h` are mounting angles.

/// Optional uncertainty entries. These are carried forward from the
/// existing record when a system is updated.
pub const TPU_PARAMETERS: &[&str] = &[
    "beam_opening_angle",
    "heading_patch_error",
    "heading_sensor_error",
    "heave_error",
    "horizontal_positioning_error",
    "latency_patch_error",
    "pitch_patch_error",
    "pitch_sensor_error",
    "roll_patch_error",
    "roll_sensor_error",
    "separation_model_error",
    "surface_sv_error",
    "timing_latency_error",
    "vertical_positioning_error",
    "vessel_speed_error",
    "waterline_error",
    "x_offset_error",
    "y_offset_error",
    "z_offset_error",
];

/// Sensors that carry lever arms and mounting angles.
pub const SENSORS: &[&str] = &["antenna", "imu", "rx", "tx"];

/// Waterline entry name.
pub const WATERLINE: &str = "waterline";

/// Latency entry name.
pub const LATENCY: &str = "latency";

/// How an entry is compared between two records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryCategory {
    /// Lever arm (x/y/z).
    Offset,
    /// Mounting angle (r/p/h) or latency.
    Angle,
    /// Optional uncertainty parameter.
    Tpu,
    /// Waterline, compared on its first value only.
    Waterline,
    /// Anything else (sonar type, source file, ...).
    Other,
}

/// Category of the entry `name`.
pub fn classify(name: &str) -> EntryCategory {
    if name == WATERLINE {
        return EntryCategory::Waterline;
    }
    if is_tpu_parameter(name) {
        return EntryCategory::Tpu;
    }
    if name == LATENCY {
        return EntryCategory::Angle;
    }

    let mut parts: Vec<&str> = name.split('_').collect();
    if parts.len() > 2 && parts.last().is_some_and(|p| p.parse::<u32>().is_ok()) {
        parts.pop();
    }
    if parts.len() < 2 || !SENSORS.contains(&parts[0]) {
        return EntryCategory::Other;
    }

    match parts[parts.len() - 1] {
        "x" | "y" | "z" => EntryCategory::Offset,
        "r" | "p" | "h" => EntryCategory::Angle,
        _ => EntryCategory::Other,
    }
}

/// True for optional uncertainty entries.
pub fn is_tpu_parameter(name: &str) -> bool {
    TPU_PARAMETERS.contains(&name)
}
