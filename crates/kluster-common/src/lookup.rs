//! Closest-key lookups over numeric timestamps.
//!
//! Used to match a record time to the sensor-offset entry in effect at that
//! time. Keys do not need to be sorted.

/// Window (seconds) before the first key that still resolves to the first key.
pub const PRIOR_KEY_TOLERANCE_SECS: f64 = 60.0;

/// Return the largest key less than or equal to `value`.
///
/// A value up to [`PRIOR_KEY_TOLERANCE_SECS`] before the smallest key resolves
/// to the smallest key. Returns `None` for anything earlier or when `keys` is
/// empty.
pub fn closest_prior_key_value(keys: &[f64], value: f64) -> Option<f64> {
    closest_prior_key_value_within(keys, value, PRIOR_KEY_TOLERANCE_SECS)
}

/// Return the largest key less than or equal to `value`, accepting values up
/// to `tolerance` before the smallest key.
///
/// A value in `[min_key - tolerance, min_key)` resolves to `min_key`.
pub fn closest_prior_key_value_within(keys: &[f64], value: f64, tolerance: f64) -> Option<f64> {
    if value.is_nan() {
        return None;
    }

    let prior = keys
        .iter()
        .copied()
        .filter(|k| !k.is_nan() && *k <= value)
        .fold(None, |best: Option<f64>, k| match best {
            Some(b) if b >= k => Some(b),
            _ => Some(k),
        });
    if prior.is_some() {
        return prior;
    }

    let first = keys
        .iter()
        .copied()
        .filter(|k| !k.is_nan())
        .fold(None, |best: Option<f64>, k| match best {
            Some(b) if b <= k => Some(b),
            _ => Some(k),
        })?;

    if value >= first - tolerance.max(0.0) {
        Some(first)
    } else {
        None
    }
}

/// Return the key with the minimum absolute distance to `value`.
///
/// Ties resolve to the earlier key in `keys`.
pub fn closest_key_value(keys: &[f64], value: f64) -> Option<f64> {
    keys.iter()
        .copied()
        .filter(|k| !k.is_nan())
        .fold(None, |best: Option<f64>, k| match best {
            Some(b) if (b - value).abs() <= (k - value).abs() => Some(b),
            _ => Some(k),
        })
}
