//! HTTP client for the pressure signal service.
//!
//! Calls follow the platform's JSON envelope convention: every response body
//! is `{"code": "0", "msg": "", "data": ...}` and any other code is an error.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::context::RequestContext;
use super::source::SignalSource;
use crate::config::{
    HEADER_LOG_ID, SIGNAL_BATCH_SLEEPTIME_PATH, SIGNAL_SLEEPTIME_PATH, SIGNAL_SUCCESS_CODE,
};
use crate::error_handling::SignalSourceError;

/// Signal source backed by the pressure service's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpSignalSource {
    client: Arc<reqwest::Client>,
    base_url: String,
}

#[derive(Serialize)]
struct SingleRequest<'a> {
    key: &'a str,
}

#[derive(Serialize)]
struct BatchRequest<'a> {
    keys: &'a [String],
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    code: Value,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: Value,
}

#[derive(Deserialize, Default)]
struct SingleData {
    #[serde(default)]
    sleeptime: i64,
}

#[derive(Deserialize, Default)]
struct BatchData {
    #[serde(default)]
    sleeptimes: HashMap<String, i64>,
}

impl HttpSignalSource {
    /// Creates a source talking to `base_url` (scheme and host, optionally a
    /// path prefix) through the given client.
    ///
    /// The client's timeout is the only bound on a refresh tick's duration.
    pub fn new(client: Arc<reqwest::Client>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        HttpSignalSource { client, base_url }
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B, T>(
        &self,
        ctx: &RequestContext,
        path: &str,
        body: &B,
    ) -> Result<T, SignalSourceError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.post(&url).json(body);
        for (name, value) in ctx.headers() {
            request = request.header(name, value);
        }

        let response = request.send().await?;
        let status = response.status();
        let log_id = response
            .headers()
            .get(HEADER_LOG_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(SignalSourceError::Status {
                status: status.as_u16(),
                body: text,
                log_id,
            });
        }

        let envelope: Envelope = serde_json::from_str(&text)?;
        let code = envelope_code(&envelope.code);
        if code != SIGNAL_SUCCESS_CODE {
            return Err(SignalSourceError::Api {
                code,
                msg: envelope.msg,
                log_id,
            });
        }

        debug!("Signal source {} answered (logid: {})", path, log_id);
        if envelope.data.is_null() {
            return Ok(T::default());
        }
        Ok(serde_json::from_value(envelope.data)?)
    }
}

#[async_trait]
impl SignalSource for HttpSignalSource {
    async fn sleep_time(&self, ctx: &RequestContext, key: &str) -> Result<i32, SignalSourceError> {
        let data: SingleData = self
            .post(ctx, SIGNAL_SLEEPTIME_PATH, &SingleRequest { key })
            .await?;
        Ok(saturate_ms(data.sleeptime))
    }

    async fn batch_sleep_time(
        &self,
        ctx: &RequestContext,
        keys: &[String],
    ) -> Result<HashMap<String, i32>, SignalSourceError> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }
        let data: BatchData = self
            .post(ctx, SIGNAL_BATCH_SLEEPTIME_PATH, &BatchRequest { keys })
            .await?;
        Ok(data
            .sleeptimes
            .into_iter()
            .map(|(key, ms)| (key, saturate_ms(ms)))
            .collect())
    }
}

/// The platform sometimes encodes the code as a number.
fn envelope_code(code: &Value) -> String {
    match code {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn saturate_ms(ms: i64) -> i32 {
    i32::try_from(ms).unwrap_or(if ms < 0 { i32::MIN } else { i32::MAX })
}
