//! Configuration and constants.
//!
//! This module provides:
//! - Compiled-in defaults for the decelerator and rate limiter
//! - Outbound header names used by the HTTP signal source
//! - The hot-swappable [`PressureConfig`] snapshot
//! - CLI option types for the diagnostic binary

mod constants;
mod pressure;
mod types;

// Re-export all constants
pub use constants::*;
pub use pressure::PressureConfig;
pub use types::{LogFormat, LogLevel, Opt};
