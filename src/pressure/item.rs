//! Per-key cache entry.

use std::sync::atomic::{AtomicI32, AtomicI64, Ordering};
use tokio::sync::OnceCell;

/// Last known sleep time for one signal key.
///
/// The two scalars have independent writers (readers bump the access time,
/// fetches store the sleep time), so each is its own atomic rather than
/// sharing a lock.
#[derive(Debug)]
pub(crate) struct PressureItem {
    key: String,
    /// Milliseconds, always >= 0
    sleep_ms: AtomicI32,
    /// Milliseconds since the owning decelerator's epoch
    last_access_ms: AtomicI64,
    /// Set once the first fetch for this entry has completed
    pub(crate) loaded: OnceCell<()>,
}

impl PressureItem {
    pub(crate) fn new(key: &str, now_ms: i64) -> Self {
        PressureItem {
            key: key.to_owned(),
            sleep_ms: AtomicI32::new(0),
            last_access_ms: AtomicI64::new(now_ms),
            loaded: OnceCell::new(),
        }
    }

    pub(crate) fn key(&self) -> &str {
        &self.key
    }

    pub(crate) fn sleep_ms(&self) -> i32 {
        self.sleep_ms.load(Ordering::Relaxed)
    }

    pub(crate) fn store_sleep_ms(&self, ms: i32) {
        self.sleep_ms.store(ms, Ordering::Relaxed);
    }

    pub(crate) fn last_access_ms(&self) -> i64 {
        self.last_access_ms.load(Ordering::Relaxed)
    }

    pub(crate) fn touch(&self, now_ms: i64) {
        self.last_access_ms.store(now_ms, Ordering::Relaxed);
    }
}
