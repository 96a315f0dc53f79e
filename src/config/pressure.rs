//! Pressure decelerator configuration.
//!
//! The runtime hands the configuration down as a JSON string. Anything that
//! does not make sense (missing document, bad JSON, non-positive values) is
//! snapped to the compiled-in defaults instead of being reported as an error.

use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};

use super::constants::{
    DEFAULT_EVICT_THRESHOLD_MS, DEFAULT_MAX_KEY_CAPACITY, DEFAULT_MAX_SLEEP_MS,
    DEFAULT_UPDATE_INTERVAL_MS,
};

/// Immutable configuration snapshot for the pressure decelerator.
///
/// Replaced as a whole via
/// [`PressureDecelerator::update_config`](crate::pressure::PressureDecelerator::update_config),
/// never mutated in place. The decelerator always stores a [normalized](Self::normalized)
/// copy, so every field it reads is usable.
///
/// # Examples
///
/// ```
/// use pressure_gate::config::PressureConfig;
///
/// let config = PressureConfig::from_json_str(r#"{"MaxSleeptime": 500, "UpdateInterval": 0}"#);
/// assert_eq!(config.max_sleep_ms, 500);
/// assert_eq!(config.update_interval_ms, 5000); // zero snapped to the default
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PressureConfig {
    /// Upper clamp on returned sleep times (ms). `0` means "use the default",
    /// a negative value disables the clamp.
    #[serde(rename = "MaxSleeptime")]
    pub max_sleep_ms: i64,

    /// Period of the background batch refresh (ms), must be positive.
    #[serde(rename = "UpdateInterval")]
    pub update_interval_ms: i64,

    /// Maximum number of keys tracked; least-recently-used keys beyond this
    /// are evicted on the next tick. Must be positive.
    #[serde(rename = "MaxKeyCapacity")]
    pub max_key_capacity: i64,

    /// A key not queried for this long (ms) is evicted on the next tick.
    /// Must be positive.
    #[serde(rename = "EvictThreshold")]
    pub evict_threshold_ms: i64,
}

impl Default for PressureConfig {
    fn default() -> Self {
        Self {
            max_sleep_ms: DEFAULT_MAX_SLEEP_MS,
            update_interval_ms: DEFAULT_UPDATE_INTERVAL_MS,
            max_key_capacity: DEFAULT_MAX_KEY_CAPACITY,
            evict_threshold_ms: DEFAULT_EVICT_THRESHOLD_MS,
        }
    }
}

impl PressureConfig {
    /// Parses the runtime-provided JSON document.
    ///
    /// An empty document yields the defaults. A document that fails to parse
    /// is logged and also yields the defaults. Missing fields fall back to
    /// their defaults, and the result is always [normalized](Self::normalized).
    pub fn from_json_str(data: &str) -> Self {
        if data.trim().is_empty() {
            return Self::default();
        }

        match serde_json::from_str::<PressureConfig>(data) {
            Ok(config) => config.normalized(),
            Err(e) => {
                warn!("Invalid pressure config JSON, falling back to defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Returns a copy with every field materialized to a usable value.
    ///
    /// - `max_sleep_ms == 0` becomes the default; negative values are kept
    ///   and mean "unclamped".
    /// - Non-positive `update_interval_ms`, `max_key_capacity` and
    ///   `evict_threshold_ms` become their defaults.
    pub fn normalized(self) -> Self {
        Self {
            max_sleep_ms: if self.max_sleep_ms == 0 {
                DEFAULT_MAX_SLEEP_MS
            } else {
                self.max_sleep_ms
            },
            update_interval_ms: positive_or(self.update_interval_ms, DEFAULT_UPDATE_INTERVAL_MS),
            max_key_capacity: positive_or(self.max_key_capacity, DEFAULT_MAX_KEY_CAPACITY),
            evict_threshold_ms: positive_or(self.evict_threshold_ms, DEFAULT_EVICT_THRESHOLD_MS),
        }
    }

    /// Applies the sleep time clamp to a raw signal source value.
    ///
    /// Negative values become 0. When the clamp is enabled (positive
    /// `max_sleep_ms`) the result never exceeds it.
    pub fn clamp_sleep_ms(&self, raw: i32) -> i32 {
        let value = raw.max(0);
        if self.max_sleep_ms > 0 {
            let max = i32::try_from(self.max_sleep_ms).unwrap_or(i32::MAX);
            value.min(max)
        } else {
            value
        }
    }

    /// Refresh tick period.
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(u64::try_from(self.update_interval_ms).unwrap_or(1).max(1))
    }

    /// Capacity as a collection length.
    pub fn capacity(&self) -> usize {
        usize::try_from(self.max_key_capacity).unwrap_or(1).max(1)
    }
}

fn positive_or(value: i64, default: i64) -> i64 {
    if value > 0 {
        value
    } else {
        default
    }
}
