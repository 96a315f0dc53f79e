//! Error types for the admission-control core.
//!
//! Errors fall into three groups:
//! - **Signal source failures**: recovered inside the decelerator (the last
//!   known sleep time is kept) and only ever logged
//! - **Admission rejections**: surfaced to the caller of the outbound gate
//! - **Initialization failures**: logger and HTTP client setup
//!
//! Misconfiguration is not an error: it is corrected by
//! [`PressureConfig::normalized`](crate::config::PressureConfig::normalized).

mod types;

// Re-export public API
pub use types::{AdmissionError, InitializationError, SignalSourceError};
