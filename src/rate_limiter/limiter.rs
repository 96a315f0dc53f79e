//! Sliding-window rate limiter implementation.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

use super::window::SlidingWindow;
use crate::config::{DEFAULT_QUOTA, RATE_LIMIT_WINDOW};

/// Per-instance admission counter over a trailing one-second window.
///
/// The quota applies to the trailing window measured continuously, not to
/// aligned clock buckets, so a burst straddling a second boundary cannot
/// double the effective rate.
///
/// A quota `<= 0` means unlimited; that path takes no lock.
#[derive(Debug)]
pub struct RateLimiter {
    quota: AtomicI64,
    window: Mutex<SlidingWindow>,
}

impl RateLimiter {
    /// Creates a limiter with the given quota (requests per second).
    pub fn new(quota: i64) -> Self {
        Self::with_window(quota, RATE_LIMIT_WINDOW)
    }

    /// Creates a limiter with a custom window size.
    pub fn with_window(quota: i64, window_size: Duration) -> Self {
        RateLimiter {
            quota: AtomicI64::new(quota),
            window: Mutex::new(SlidingWindow::new(window_size)),
        }
    }

    /// Decides whether one more request may proceed now.
    ///
    /// Admitting records the request in the window; a rejection leaves the
    /// window untouched.
    pub fn allow_request(&self) -> bool {
        let quota = self.quota.load(Ordering::SeqCst);
        if quota <= 0 {
            return true;
        }
        let quota = usize::try_from(quota).unwrap_or(usize::MAX);

        // The window only holds timestamps, any state a panicking holder left is valid
        let mut window = self.window.lock().unwrap_or_else(PoisonError::into_inner);
        window.try_admit(Instant::now(), quota)
    }

    /// Replaces the quota. Returns `true` if the value actually changed.
    ///
    /// Lowering the quota does not drop admissions already in the window;
    /// new requests are rejected until enough of them age out.
    pub fn reset_quota(&self, quota: i64) -> bool {
        self.quota.swap(quota, Ordering::SeqCst) != quota
    }

    /// Current quota (`<= 0` = unlimited).
    pub fn quota(&self) -> i64 {
        self.quota.load(Ordering::SeqCst)
    }

    /// Number of admissions inside the trailing window.
    pub fn in_window(&self) -> usize {
        let mut window = self.window.lock().unwrap_or_else(PoisonError::into_inner);
        window.count(Instant::now())
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_QUOTA)
    }
}
