//! pressure_gate library: backpressure admission control for outbound platform calls
//!
//! This library keeps one instance from overwhelming the platform's internal
//! APIs. It combines two mechanisms that every outbound request passes:
//! - A sliding-window [`RateLimiter`] that bounds requests per second
//! - A [`PressureDecelerator`] that caches, per signal key, how long to back
//!   off before calling, and refreshes those values in the background
//!
//! [`OutboundGate`] wires both into the request path.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use pressure_gate::{
//!     FixedSignalSource, OutboundGate, PressureConfig, PressureDecelerator, RateLimiter,
//!     RequestContext,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let decelerator = Arc::new(PressureDecelerator::start(
//!     PressureConfig::from_json_str(r#"{"MaxSleeptime": 500}"#),
//!     RequestContext::new().with_tenant("acme"),
//!     Arc::new(FixedSignalSource::new(50)),
//! ));
//! let gate = OutboundGate::new(Arc::new(RateLimiter::new(100)))
//!     .with_decelerator(Arc::clone(&decelerator));
//!
//! let admission = gate.admit(Some("orders")).await?;
//! println!("paced for {:?}", admission.paced);
//!
//! decelerator.stop();
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! The decelerator's refresh task and the gate's pacing require a Tokio
//! runtime. The rate limiter itself is synchronous.

#![warn(missing_docs)]

pub mod config;
pub mod dispatch;
pub mod error_handling;
pub mod initialization;
pub mod pressure;
pub mod rate_limiter;

// Re-export public API
pub use config::{LogFormat, LogLevel, PressureConfig};
pub use dispatch::{Admission, OutboundGate};
pub use error_handling::{AdmissionError, InitializationError, SignalSourceError};
pub use pressure::{
    FixedSignalSource, HttpSignalSource, PressureDecelerator, RequestContext, SignalSource,
    TickOutcome,
};
pub use rate_limiter::RateLimiter;
