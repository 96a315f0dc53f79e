// Shared test helpers: scripted signal sources with call counters.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use pressure_gate::{RequestContext, SignalSource, SignalSourceError};

/// Signal source answering from a mutable table, counting every call.
///
/// - Single-key calls answer the table value, or `default_ms` for unknown keys
/// - Batch calls answer only the keys present in the table
/// - Every call sleeps `delay` first (on the Tokio clock)
#[allow(dead_code)] // Not every test file uses every helper
#[derive(Default)]
pub struct ScriptedSource {
    values: Mutex<HashMap<String, i32>>,
    default_ms: i32,
    delay: Duration,
    fail_batches: AtomicBool,
    single_calls: AtomicUsize,
    batches: Mutex<Vec<Vec<String>>>,
}

#[allow(dead_code)]
impl ScriptedSource {
    pub fn new(default_ms: i32) -> Self {
        ScriptedSource {
            default_ms,
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn set(&self, key: &str, ms: i32) {
        self.values
            .lock()
            .expect("values lock")
            .insert(key.to_string(), ms);
    }

    pub fn fail_batches(&self, fail: bool) {
        self.fail_batches.store(fail, Ordering::SeqCst);
    }

    pub fn single_calls(&self) -> usize {
        self.single_calls.load(Ordering::SeqCst)
    }

    pub fn batch_calls(&self) -> usize {
        self.batches.lock().expect("batches lock").len()
    }

    /// Keys of every batch call so far, sorted within each call.
    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches
            .lock()
            .expect("batches lock")
            .iter()
            .map(|keys| {
                let mut keys = keys.clone();
                keys.sort();
                keys
            })
            .collect()
    }
}

#[async_trait]
impl SignalSource for ScriptedSource {
    async fn sleep_time(&self, _ctx: &RequestContext, key: &str) -> Result<i32, SignalSourceError> {
        self.single_calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let values = self.values.lock().expect("values lock");
        Ok(values.get(key).copied().unwrap_or(self.default_ms))
    }

    async fn batch_sleep_time(
        &self,
        _ctx: &RequestContext,
        keys: &[String],
    ) -> Result<HashMap<String, i32>, SignalSourceError> {
        self.batches
            .lock()
            .expect("batches lock")
            .push(keys.to_vec());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail_batches.load(Ordering::SeqCst) {
            return Err(SignalSourceError::Api {
                code: "k_op_ec_20001".into(),
                msg: "system busy".into(),
                log_id: String::new(),
            });
        }
        let values = self.values.lock().expect("values lock");
        Ok(keys
            .iter()
            .filter_map(|key| values.get(key).map(|ms| (key.clone(), *ms)))
            .collect())
    }
}
