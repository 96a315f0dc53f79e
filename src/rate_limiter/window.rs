//! Sliding window of admission timestamps.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

/// Admission timestamps that fall within the trailing window.
///
/// Not synchronized; [`RateLimiter`](super::RateLimiter) wraps it in a mutex
/// because purge-and-append has to happen as one unit.
#[derive(Debug)]
pub(crate) struct SlidingWindow {
    admitted: VecDeque<Instant>,
    window_duration: Duration,
}

impl SlidingWindow {
    pub(crate) fn new(window_duration: Duration) -> Self {
        SlidingWindow {
            admitted: VecDeque::new(),
            window_duration,
        }
    }

    /// Removes entries older than the window from the front.
    fn purge(&mut self, now: Instant) {
        while let Some(front) = self.admitted.front() {
            if now.duration_since(*front) > self.window_duration {
                self.admitted.pop_front();
            } else {
                break;
            }
        }
    }

    /// Admits and records `now` if fewer than `quota` admissions remain in
    /// the window after purging.
    pub(crate) fn try_admit(&mut self, now: Instant, quota: usize) -> bool {
        self.purge(now);

        if self.admitted.len() < quota {
            self.admitted.push_back(now);
            true
        } else {
            false
        }
    }

    /// Number of admissions still inside the window at `now`.
    pub(crate) fn count(&mut self, now: Instant) -> usize {
        self.purge(now);
        self.admitted.len()
    }
}
