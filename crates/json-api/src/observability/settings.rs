//! Request middleware runtime settings.

use crate::config::ServerConfig;

/// Knobs the request logging middleware reads on every request.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RequestSettings {
    /// Requests slower than this are logged at warn level.
    pub(crate) slow_request_threshold_ms: u64,

    /// Honour an incoming `traceparent` header.
    pub(crate) parent_propagation_enabled: bool,
}

impl Default for RequestSettings {
    fn default() -> Self {
        Self {
            slow_request_threshold_ms: 1_000,
            parent_propagation_enabled: false,
        }
    }
}

impl From<&ServerConfig> for RequestSettings {
    fn from(config: &ServerConfig) -> Self {
        Self {
            slow_request_threshold_ms: config.observability.slow_request_threshold_ms,
            parent_propagation_enabled: config.observability.otel_enabled
                && config.observability.otel_parent_propagation_enabled,
        }
    }
}
