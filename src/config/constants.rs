//! Configuration constants.
//!
//! Defaults applied when the runtime hands us a missing, malformed or
//! non-positive pressure configuration, plus the fixed parameters of the
//! admission window.

use std::time::Duration;

// Pressure decelerator defaults
/// Upper clamp on any returned sleep time, in milliseconds (1s)
pub const DEFAULT_MAX_SLEEP_MS: i64 = 1000;
/// Period of the background batch refresh, in milliseconds (5s)
pub const DEFAULT_UPDATE_INTERVAL_MS: i64 = 5000;
/// Maximum number of distinct signal keys tracked.
/// Matches the batch capacity of the signal source endpoint.
pub const DEFAULT_MAX_KEY_CAPACITY: i64 = 1000;
/// A key idle for longer than this is evicted on the next tick, in milliseconds (2min)
pub const DEFAULT_EVICT_THRESHOLD_MS: i64 = 2 * 60 * 1000;

// Rate limiter
/// Trailing window the admission quota applies to.
/// Fixed at one second, so the quota reads as requests per second.
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(1);
/// Initial quota; any value `<= 0` disables limiting.
pub const DEFAULT_QUOTA: i64 = -1;

// Signal source HTTP API
/// Path of the single-key sleep time endpoint
pub const SIGNAL_SLEEPTIME_PATH: &str = "/pressure/v1/sleeptime";
/// Path of the batch sleep time endpoint
pub const SIGNAL_BATCH_SLEEPTIME_PATH: &str = "/pressure/v1/sleeptime/batch";
/// Envelope code reported by the platform API on success
pub const SIGNAL_SUCCESS_CODE: &str = "0";
/// Default timeout for signal source calls in seconds.
/// The refresh loop applies no timeout of its own, so this bounds a slow tick.
pub const SIGNAL_CLIENT_TIMEOUT_SECS: u64 = 3;

// Outbound header names
/// Tenant the call is made on behalf of
pub const HEADER_TENANT: &str = "Tenant";
/// Request log id, echoed back by the platform for tracing
pub const HEADER_LOG_ID: &str = "X-Tt-Logid";
/// Lane (traffic isolation) id
pub const HEADER_LANE: &str = "Rpc-Persist-Lane-C-Apaas-Lane";

/// Environment variable the diagnostic binary reads the pressure config from
pub const PRESSURE_CONFIG_ENV: &str = "PRESSURE_CONFIG";
