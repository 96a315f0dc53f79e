//! Error type definitions.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Failure talking to the pressure signal source.
///
/// These never reach the request path: the decelerator logs them and keeps
/// serving the last known sleep time.
#[derive(Error, Debug)]
pub enum SignalSourceError {
    /// The request could not be sent or the response body not read.
    #[error("Signal source transport error: {0}")]
    Transport(#[from] ReqwestError),

    /// The service answered with a non-2xx status.
    #[error("Signal source returned HTTP {status}: {body} (logid: {log_id})")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, as text
        body: String,
        /// Log id echoed by the platform, empty if absent
        log_id: String,
    },

    /// The envelope carried a non-success code.
    #[error("Signal source error {code}: {msg} (logid: {log_id})")]
    Api {
        /// Platform error code
        code: String,
        /// Platform error message
        msg: String,
        /// Log id echoed by the platform, empty if absent
        log_id: String,
    },

    /// The response body was not the expected JSON shape.
    #[error("Signal source response decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SignalSourceError {
    /// Log id of the failed call, when the platform returned one.
    pub fn log_id(&self) -> Option<&str> {
        match self {
            SignalSourceError::Status { log_id, .. } | SignalSourceError::Api { log_id, .. }
                if !log_id.is_empty() =>
            {
                Some(log_id.as_str())
            }
            _ => None,
        }
    }
}

/// Rejection returned by the outbound gate before any network I/O.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionError {
    /// The sliding window already holds `quota` admissions.
    #[error("Rate limit exceeded: quota of {quota} requests per second reached")]
    QuotaExceeded {
        /// Quota in force when the request was rejected
        quota: i64,
    },
}
