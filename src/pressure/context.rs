//! Ambient request context propagated to the signal source.

use crate::config::{HEADER_LANE, HEADER_LOG_ID, HEADER_TENANT};

/// Tracing and tenant values attached to every signal source call.
///
/// Held by the decelerator as one immutable snapshot and replaced wholesale
/// through
/// [`update_request_context`](crate::pressure::PressureDecelerator::update_request_context).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    tenant: Option<String>,
    log_id: Option<String>,
    lane_id: Option<String>,
}

impl RequestContext {
    /// Empty context: no headers are propagated.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tenant name.
    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    /// Sets the request log id.
    pub fn with_log_id(mut self, log_id: impl Into<String>) -> Self {
        self.log_id = Some(log_id.into());
        self
    }

    /// Sets the traffic lane id.
    pub fn with_lane_id(mut self, lane_id: impl Into<String>) -> Self {
        self.lane_id = Some(lane_id.into());
        self
    }

    /// Tenant name, if any.
    pub fn tenant(&self) -> Option<&str> {
        self.tenant.as_deref()
    }

    /// Request log id, if any.
    pub fn log_id(&self) -> Option<&str> {
        self.log_id.as_deref()
    }

    /// Traffic lane id, if any.
    pub fn lane_id(&self) -> Option<&str> {
        self.lane_id.as_deref()
    }

    /// Outbound headers for the values that are set.
    pub fn headers(&self) -> Vec<(&'static str, &str)> {
        [
            (HEADER_TENANT, self.tenant()),
            (HEADER_LOG_ID, self.log_id()),
            (HEADER_LANE, self.lane_id()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }
}
