//! Dispatcher-side integration of the rate limiter and the decelerator.
//!
//! The HTTP client calls [`OutboundGate::admit`] before every outbound call.
//! The gate owns the policy that turns a limiter rejection into either a
//! fail-fast error or an advisory warning (downgrade mode).

mod gate;

pub use gate::{Admission, OutboundGate};
