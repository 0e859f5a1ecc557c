//! Common types and utilities shared across the kluster crates.

pub mod error;
pub mod lookup;
pub mod time;

pub use error::{CommonError, CommonResult};
pub use lookup::{
    closest_key_value, closest_prior_key_value, closest_prior_key_value_within,
    PRIOR_KEY_TOLERANCE_SECS,
};
pub use time::{
    export_time_attribute, folder_suffix, parse_timestamp_key, timestamp_key, timestamp_to_datetime,
};
