//! Pressure signal source abstraction.

use std::collections::HashMap;

use async_trait::async_trait;

use super::context::RequestContext;
use crate::error_handling::SignalSourceError;

/// Remote service computing recommended sleep times per signal key.
///
/// Values are whole milliseconds; 0 means no slowdown. A key missing from a
/// batch answer means "no change" for that key.
#[async_trait]
pub trait SignalSource: Send + Sync {
    /// Recommended sleep time for a single key.
    async fn sleep_time(&self, ctx: &RequestContext, key: &str) -> Result<i32, SignalSourceError>;

    /// Recommended sleep times for many keys in one call.
    async fn batch_sleep_time(
        &self,
        ctx: &RequestContext,
        keys: &[String],
    ) -> Result<HashMap<String, i32>, SignalSourceError>;
}

/// Signal source answering every key with the same sleep time.
///
/// Handy for local runs where no pressure service is reachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSignalSource {
    sleep_ms: i32,
}

impl FixedSignalSource {
    /// Creates a source that always recommends `sleep_ms`.
    pub fn new(sleep_ms: i32) -> Self {
        FixedSignalSource { sleep_ms }
    }
}

#[async_trait]
impl SignalSource for FixedSignalSource {
    async fn sleep_time(&self, _ctx: &RequestContext, _key: &str) -> Result<i32, SignalSourceError> {
        Ok(self.sleep_ms)
    }

    async fn batch_sleep_time(
        &self,
        _ctx: &RequestContext,
        keys: &[String],
    ) -> Result<HashMap<String, i32>, SignalSourceError> {
        Ok(keys.iter().map(|key| (key.clone(), self.sleep_ms)).collect())
    }
}
