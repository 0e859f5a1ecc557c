//! Vessel configuration files.
//!
//! A vessel file records, per sonar system, how the vessel was set up over
//! time: lever arms, mounting angles, waterline, latency and the optional
//! uncertainty parameters used for total propagated uncertainty. Every entry
//! maps a UTC timestamp key to the value in effect from that time on.
//!
//! ```text
//! {
//!   "40111": {                          <- system identifier
//!     "rx_x": {"1626354881": 1.234},    <- entry -> timestamp -> value
//!     "waterline": {"1626354881": 0.2}
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde_json::Value;

pub mod compare;
pub mod convert;
pub mod error;
pub mod params;
pub mod timestamps;
pub mod vessel;

pub use compare::{carry_over_optional, compare_dict_data, only_retain_earliest_entry, DictComparison};
pub use convert::{convert_from_fqpr_xyzrph, convert_from_vessel_xyzrph, VesselXyzrph, SONAR_TYPE_KEY, SOURCE_KEY};
pub use error::{Result, VesselFileError};
pub use params::{classify, is_tpu_parameter, EntryCategory, TPU_PARAMETERS};
pub use timestamps::get_overlapping_timestamps;
pub use vessel::{create_new_vessel_file, VesselFile};

/// Values of one entry keyed by timestamp.
pub type EntryData = BTreeMap<String, Value>;

/// Entries of one system keyed by entry name.
pub type SystemData = BTreeMap<String, EntryData>;

/// Systems keyed by system identifier.
pub type VesselData = BTreeMap<String, SystemData>;
