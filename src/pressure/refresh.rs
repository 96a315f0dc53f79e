//! One refresh sweep: eviction followed by a batch fetch.

use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, warn};

use super::decelerator::Shared;

/// What a refresh sweep did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Another sweep was still running; this one did nothing.
    Skipped,
    /// No live key remained, so no batch call was made.
    Idle {
        /// Keys evicted by this sweep
        evicted: usize,
    },
    /// The batch call succeeded.
    Refreshed {
        /// Keys whose sleep time was written back
        updated: usize,
        /// Keys evicted by this sweep
        evicted: usize,
    },
    /// The batch call failed; cached values were left untouched.
    Failed {
        /// Keys evicted by this sweep
        evicted: usize,
    },
}

/// Releases the sweep exclusion flag when dropped, including on cancellation.
struct UpdatingGuard<'a>(&'a AtomicBool);

impl Drop for UpdatingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Shared {
    /// Runs one sweep unless another one holds the exclusion flag.
    ///
    /// 1. Keys idle for longer than `EvictThreshold` are evicted.
    /// 2. The remaining keys are ordered most recently used first and the
    ///    overflow beyond `MaxKeyCapacity` is evicted.
    /// 3. The survivors are fetched in one batch call and the answers written
    ///    back (clamped). Keys missing from the answer keep their value.
    pub(crate) async fn refresh(&self) -> TickOutcome {
        if self
            .updating
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Pressure decelerator: previous sweep still running, skipping tick");
            return TickOutcome::Skipped;
        }
        let _guard = UpdatingGuard(&self.updating);

        let config = self.config();
        let now = self.now_ms();

        let mut live: Vec<(String, i64)> = Vec::with_capacity(self.cache.len());
        let mut stale: Vec<String> = Vec::new();
        for entry in self.cache.iter() {
            let last_access = entry.value().last_access_ms();
            if now - last_access <= config.evict_threshold_ms {
                live.push((entry.key().clone(), last_access));
            } else {
                stale.push(entry.key().clone());
            }
        }

        // A stale key read again since the scan above stays
        let mut evicted = 0;
        for key in &stale {
            let removed = self.cache.remove_if(key, |_, item| {
                now - item.last_access_ms() > config.evict_threshold_ms
            });
            if removed.is_some() {
                evicted += 1;
            }
        }

        live.sort_by(|a, b| b.1.cmp(&a.1));
        let capacity = config.capacity();
        if live.len() > capacity {
            for (key, _) in live.split_off(capacity) {
                if self.cache.remove(&key).is_some() {
                    evicted += 1;
                }
            }
        }

        if live.is_empty() {
            if evicted > 0 {
                debug!("Pressure decelerator: evicted {} keys, nothing left to refresh", evicted);
            }
            return TickOutcome::Idle { evicted };
        }

        let keys: Vec<String> = live.into_iter().map(|(key, _)| key).collect();
        let ctx = self.context.load_full();
        let values = match self.source.batch_sleep_time(&ctx, &keys).await {
            Ok(values) => values,
            Err(e) => {
                warn!(
                    "Pressure decelerator: batch refresh of {} keys failed at {}ms: {}",
                    keys.len(),
                    now,
                    e
                );
                return TickOutcome::Failed { evicted };
            }
        };

        let mut updated = 0;
        for key in &keys {
            let Some(raw) = values.get(key) else {
                continue;
            };
            if let Some(item) = self.cache.get(key) {
                item.store_sleep_ms(config.clamp_sleep_ms(*raw));
                updated += 1;
            }
        }

        debug!(
            "Pressure decelerator: refreshed {} of {} keys, evicted {}",
            updated,
            keys.len(),
            evicted
        );
        TickOutcome::Refreshed { updated, evicted }
    }
}
