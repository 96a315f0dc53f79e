//! HTTP client initialization.
//!
//! This module provides functions to initialize the client used to reach the
//! pressure signal service.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::error_handling::InitializationError;
use crate::pressure::HttpSignalSource;

/// Initializes the HTTP client for signal source calls.
///
/// Creates a `reqwest::Client` configured with:
/// - A total request timeout of `timeout`
/// - A connect timeout of at most `timeout`
/// - Rustls TLS backend (no native TLS)
///
/// The timeout is the only bound on how long a refresh tick can take.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_signal_client(timeout: Duration) -> Result<Arc<reqwest::Client>, InitializationError> {
    let client = ClientBuilder::new()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(concat!("pressure_gate/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(Arc::new(client))
}

/// Initializes an HTTP signal source for `base_url` with its own client.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_signal_source(
    base_url: &str,
    timeout: Duration,
) -> Result<HttpSignalSource, InitializationError> {
    let client = init_signal_client(timeout)?;
    Ok(HttpSignalSource::new(client, base_url))
}
