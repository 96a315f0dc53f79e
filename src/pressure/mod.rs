//! Pressure-signal deceleration.
//!
//! The platform computes, per signal key, how long callers should back off
//! before hitting an internal API. This module keeps those recommendations
//! close to the request path:
//! - [`PressureDecelerator`] caches the last known sleep time per key,
//!   fetching it synchronously only on the first use of a key
//! - A background task refreshes all live keys in one batch call per tick
//!   and evicts idle keys and least-recently-used overflow
//! - [`SignalSource`] abstracts the remote service; [`HttpSignalSource`]
//!   talks to it over HTTP, [`FixedSignalSource`] answers a constant
//!
//! Pressure signals are an optimization hint: every failure degrades to the
//! last known value instead of surfacing to callers.

mod context;
mod decelerator;
mod http_source;
mod item;
mod refresh;
mod source;

pub use context::RequestContext;
pub use decelerator::PressureDecelerator;
pub use http_source::HttpSignalSource;
pub use refresh::TickOutcome;
pub use source::{FixedSignalSource, SignalSource};
