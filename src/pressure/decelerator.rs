//! Pressure decelerator cache and its refresh loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::{debug, info, warn};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::context::RequestContext;
use super::item::PressureItem;
use super::refresh::TickOutcome;
use super::source::SignalSource;
use crate::config::PressureConfig;

/// State shared between the handle, request-path callers and the refresh task.
pub(crate) struct Shared {
    pub(crate) config: ArcSwap<PressureConfig>,
    pub(crate) context: ArcSwap<RequestContext>,
    pub(crate) source: Arc<dyn SignalSource>,
    pub(crate) cache: DashMap<String, Arc<PressureItem>>,
    /// Held by the sweep currently running, if any
    pub(crate) updating: AtomicBool,
    epoch: Instant,
}

impl Shared {
    pub(crate) fn now_ms(&self) -> i64 {
        i64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(i64::MAX)
    }

    pub(crate) fn config(&self) -> PressureConfig {
        **self.config.load()
    }

    /// Returns the entry for `key`, inserting a fresh one on a miss. When two
    /// callers race on the same miss, both get the entry that won.
    fn item_for(&self, key: &str) -> Arc<PressureItem> {
        if let Some(item) = self.cache.get(key) {
            return Arc::clone(item.value());
        }

        match self.cache.entry(key.to_owned()) {
            Entry::Occupied(entry) => Arc::clone(entry.get()),
            Entry::Vacant(entry) => {
                let item = Arc::new(PressureItem::new(key, self.now_ms()));
                entry.insert(Arc::clone(&item));
                item
            }
        }
    }

    /// First fetch of a brand-new entry. Failures leave the value at 0.
    async fn fetch_one(&self, item: &PressureItem) {
        let ctx = self.context.load_full();
        match self.source.sleep_time(&ctx, item.key()).await {
            Ok(raw) => item.store_sleep_ms(self.config().clamp_sleep_ms(raw)),
            Err(e) => warn!(
                "Pressure decelerator: sleep time fetch for key {:?} failed: {}",
                item.key(),
                e
            ),
        }
    }
}

/// In-process cache of recommended sleep times per signal key.
///
/// - The first caller for an unseen key fetches its sleep time synchronously;
///   concurrent callers for that key wait for the same fetch.
/// - Every other call is answered from the cache.
/// - A background task (see [`start`](Self::start)) refreshes all live keys
///   in one batch call per tick, evicting keys that went idle for longer than
///   `EvictThreshold` and, beyond `MaxKeyCapacity`, the least recently used.
///
/// Signal source failures never reach callers: the last known value (or 0)
/// is served instead.
///
/// Dropping the handle stops the refresh task.
pub struct PressureDecelerator {
    shared: Arc<Shared>,
    shutdown: CancellationToken,
    started: AtomicBool,
}

impl PressureDecelerator {
    /// Creates a decelerator without starting the refresh task.
    ///
    /// `config` is normalized before use.
    pub fn new(
        config: PressureConfig,
        context: RequestContext,
        source: Arc<dyn SignalSource>,
    ) -> Self {
        let shared = Shared {
            config: ArcSwap::from_pointee(config.normalized()),
            context: ArcSwap::from_pointee(context),
            source,
            cache: DashMap::new(),
            updating: AtomicBool::new(false),
            epoch: Instant::now(),
        };
        PressureDecelerator {
            shared: Arc::new(shared),
            shutdown: CancellationToken::new(),
            started: AtomicBool::new(false),
        }
    }

    /// Creates a decelerator and starts its refresh task.
    ///
    /// Must be called within a Tokio runtime.
    pub fn start(
        config: PressureConfig,
        context: RequestContext,
        source: Arc<dyn SignalSource>,
    ) -> Self {
        let decelerator = Self::new(config, context, source);
        decelerator.run_update_task();
        decelerator
    }

    /// Spawns the refresh task. Only the first call has an effect, and none
    /// after [`stop`](Self::stop).
    ///
    /// The first tick fires one `UpdateInterval` after this call. Each tick
    /// runs its sweep on a separate task, so a slow signal source never
    /// delays the ticker; a tick that finds the previous sweep still running
    /// is dropped.
    pub fn run_update_task(&self) {
        if self.shutdown.is_cancelled() || self.started.swap(true, Ordering::SeqCst) {
            return;
        }

        let shared = Arc::clone(&self.shared);
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            let mut period = shared.config().update_interval();
            let mut ticker = new_ticker(period);
            info!(
                "Pressure decelerator refresh task started (interval {}ms)",
                period.as_millis()
            );

            loop {
                tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => {
                        debug!("Pressure decelerator refresh task shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        let sweep = Arc::clone(&shared);
                        tokio::spawn(async move {
                            sweep.refresh().await;
                        });

                        let latest = shared.config().update_interval();
                        if latest != period {
                            info!(
                                "Pressure decelerator refresh interval changed {}ms → {}ms",
                                period.as_millis(),
                                latest.as_millis()
                            );
                            period = latest;
                            ticker = new_ticker(period);
                        }
                    }
                }
            }
        });
    }

    /// Recommended sleep time for `key`, in milliseconds.
    ///
    /// Empty keys return 0 without touching the cache. Only the first call
    /// for an unseen key waits on the signal source. The result is clamped
    /// against the current `MaxSleeptime`, so a lowered limit applies to
    /// cached values right away.
    pub async fn sleep_time(&self, key: &str) -> i32 {
        if key.is_empty() {
            return 0;
        }

        let item = self.shared.item_for(key);
        item.loaded
            .get_or_init(|| self.shared.fetch_one(&item))
            .await;
        item.touch(self.shared.now_ms());
        self.shared.config().clamp_sleep_ms(item.sleep_ms())
    }

    /// Runs one refresh sweep now, under the same exclusion as the ticker.
    pub async fn refresh_now(&self) -> TickOutcome {
        self.shared.refresh().await
    }

    /// Replaces the configuration snapshot. Takes effect on the next read or
    /// tick; a changed `UpdateInterval` re-arms the ticker after its next tick.
    pub fn update_config(&self, config: PressureConfig) {
        let config = config.normalized();
        info!("Pressure decelerator config updated: {:?}", config);
        self.shared.config.store(Arc::new(config));
    }

    /// Replaces the context used for signal source calls.
    pub fn update_request_context(&self, context: RequestContext) {
        self.shared.context.store(Arc::new(context));
    }

    /// Current configuration snapshot.
    pub fn config(&self) -> PressureConfig {
        self.shared.config()
    }

    /// Current request context snapshot.
    pub fn request_context(&self) -> Arc<RequestContext> {
        self.shared.context.load_full()
    }

    /// Stops the refresh task. A sweep already running completes; no new
    /// tick starts.
    pub fn stop(&self) {
        if !self.shutdown.is_cancelled() {
            debug!("Pressure decelerator stop requested");
        }
        self.shutdown.cancel();
    }

    /// Whether [`stop`](Self::stop) has been called.
    pub fn is_stopped(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.shared.cache.len()
    }

    /// Whether no key is tracked.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `key` is currently tracked.
    pub fn contains(&self, key: &str) -> bool {
        self.shared.cache.contains_key(key)
    }

    /// Cached sleep time for `key` without fetching or counting as an access.
    pub fn peek(&self, key: &str) -> Option<i32> {
        self.shared.cache.get(key).map(|item| item.sleep_ms())
    }
}

impl Drop for PressureDecelerator {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

impl std::fmt::Debug for PressureDecelerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PressureDecelerator")
            .field("config", &self.config())
            .field("keys", &self.len())
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

fn new_ticker(period: std::time::Duration) -> Interval {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}
