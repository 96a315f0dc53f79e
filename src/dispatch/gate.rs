//! Admission and pacing in front of outbound calls.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};

use crate::error_handling::AdmissionError;
use crate::pressure::PressureDecelerator;
use crate::rate_limiter::RateLimiter;

/// What the gate decided for one request that may proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    /// The quota was exhausted but downgrade mode let the request through.
    pub downgraded: bool,
    /// Delay applied before returning, from the key's pressure signal.
    pub paced: Duration,
}

/// Gate every outbound platform API call passes before hitting the network.
///
/// 1. Asks the [`RateLimiter`] for admission. On rejection the request fails
///    fast with [`AdmissionError::QuotaExceeded`], unless downgrade mode is
///    on, in which case it proceeds and the rejection is only logged.
/// 2. If the request carries a signal key and a decelerator is attached,
///    sleeps for the key's recommended time.
#[derive(Debug)]
pub struct OutboundGate {
    limiter: Arc<RateLimiter>,
    decelerator: Option<Arc<PressureDecelerator>>,
    downgrade: AtomicBool,
}

impl OutboundGate {
    /// Creates a gate over `limiter`, with downgrade mode off.
    pub fn new(limiter: Arc<RateLimiter>) -> Self {
        OutboundGate {
            limiter,
            decelerator: None,
            downgrade: AtomicBool::new(false),
        }
    }

    /// Attaches a decelerator used to pace keyed requests.
    pub fn with_decelerator(mut self, decelerator: Arc<PressureDecelerator>) -> Self {
        self.decelerator = Some(decelerator);
        self
    }

    /// Sets the initial downgrade mode.
    pub fn with_downgrade(self, downgrade: bool) -> Self {
        self.set_downgrade(downgrade);
        self
    }

    /// Switches downgrade mode at runtime.
    pub fn set_downgrade(&self, downgrade: bool) {
        self.downgrade.store(downgrade, Ordering::SeqCst);
    }

    /// Whether a rejected request is let through anyway.
    pub fn downgrade(&self) -> bool {
        self.downgrade.load(Ordering::SeqCst)
    }

    /// Replaces the limiter's quota; logs and returns `true` if it changed.
    pub fn reset_quota(&self, quota: i64) -> bool {
        let previous = self.limiter.quota();
        let changed = self.limiter.reset_quota(quota);
        if changed {
            info!("Outbound quota changed {} → {}", previous, quota);
        }
        changed
    }

    /// Underlying rate limiter.
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Attached decelerator, if any.
    pub fn decelerator(&self) -> Option<&Arc<PressureDecelerator>> {
        self.decelerator.as_ref()
    }

    /// Decides whether the request may proceed and paces it.
    ///
    /// Returns once the request is allowed to hit the network. No I/O happens
    /// on the rejection path.
    ///
    /// # Errors
    ///
    /// Returns [`AdmissionError::QuotaExceeded`] when the quota is exhausted
    /// and downgrade mode is off.
    pub async fn admit(&self, signal_key: Option<&str>) -> Result<Admission, AdmissionError> {
        let mut downgraded = false;
        if !self.limiter.allow_request() {
            let quota = self.limiter.quota();
            if !self.downgrade() {
                return Err(AdmissionError::QuotaExceeded { quota });
            }
            warn!(
                "Outbound quota of {} requests per second exceeded, proceeding in downgrade mode",
                quota
            );
            downgraded = true;
        }

        let paced = self.pace(signal_key).await;
        Ok(Admission { downgraded, paced })
    }

    /// Sleeps for the key's recommended time and returns it.
    async fn pace(&self, signal_key: Option<&str>) -> Duration {
        let (Some(decelerator), Some(key)) = (&self.decelerator, signal_key) else {
            return Duration::ZERO;
        };

        let sleep_ms = decelerator.sleep_time(key).await;
        if sleep_ms <= 0 {
            return Duration::ZERO;
        }

        let delay = Duration::from_millis(u64::try_from(sleep_ms).unwrap_or(0));
        tokio::time::sleep(delay).await;
        delay
    }
}
