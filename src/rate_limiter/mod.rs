//! Sliding-window rate limiting.
//!
//! This module bounds the number of outbound requests per instance:
//! - Keeps the admission timestamps of the trailing one-second window
//! - Purges expired timestamps lazily, before each decision
//! - Admits while fewer than `quota` admissions remain in the window
//! - Treats a quota `<= 0` as unlimited, without touching the lock
//!
//! The quota can be replaced at runtime; see [`RateLimiter::reset_quota`].

mod limiter;
mod window;

pub use limiter::RateLimiter;
