//! Telemetry port.
//!
//! The order service reports request counts, durations and order creations
//! through [`Telemetry`] and asks it for the propagation headers of the
//! current span. Concrete exporters live with the binary that wires the
//! service together.

use std::{collections::HashMap, time::Duration};

use mockall::automock;
use tracing::Span;

/// Order operations that are measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateOrder,
    ListOrders,
    GetOrder,
    UpdateOrderStatus,
}

impl Operation {
    /// HTTP method the operation is served under.
    #[must_use]
    pub const fn method(self) -> &'static str {
        match self {
            Operation::CreateOrder => "POST",
            Operation::ListOrders | Operation::GetOrder => "GET",
            Operation::UpdateOrderStatus => "PUT",
        }
    }

    /// Endpoint template the operation is served under.
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Operation::CreateOrder | Operation::ListOrders => "/orders",
            Operation::GetOrder => "/orders/{id}",
            Operation::UpdateOrderStatus => "/orders/{id}/status",
        }
    }
}

/// Whether a measured operation succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Success,
    Error,
}

impl Outcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Error => "error",
        }
    }

    #[must_use]
    pub const fn of<T, E>(result: &Result<T, E>) -> Self {
        if result.is_ok() {
            Outcome::Success
        } else {
            Outcome::Error
        }
    }
}

/// Propagation headers (`traceparent`, `tracestate`, ...) for an outbound call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceContext(HashMap<String, String>);

impl TraceContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, String>> for TraceContext {
    fn from(headers: HashMap<String, String>) -> Self {
        Self(headers)
    }
}

#[automock]
pub trait Telemetry: Send + Sync {
    /// Count one handled operation.
    fn record_request(&self, operation: Operation, outcome: Outcome);

    /// Observe how long an operation took.
    fn record_duration(&self, operation: Operation, duration: Duration);

    /// Count one persisted order.
    fn record_order_created(&self);

    /// Propagation headers identifying `span` to a downstream service.
    fn trace_context(&self, span: &Span) -> TraceContext;
}

/// Telemetry that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetry;

impl Telemetry for NoopTelemetry {
    fn record_request(&self, _operation: Operation, _outcome: Outcome) {}

    fn record_duration(&self, _operation: Operation, _duration: Duration) {}

    fn record_order_created(&self) {}

    fn trace_context(&self, _span: &Span) -> TraceContext {
        TraceContext::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operations_map_to_their_routes() {
        assert_eq!(
            (Operation::CreateOrder.method(), Operation::CreateOrder.endpoint()),
            ("POST", "/orders")
        );
        assert_eq!(
            (Operation::GetOrder.method(), Operation::GetOrder.endpoint()),
            ("GET", "/orders/{id}")
        );
        assert_eq!(
            (
                Operation::UpdateOrderStatus.method(),
                Operation::UpdateOrderStatus.endpoint()
            ),
            ("PUT", "/orders/{id}/status")
        );
    }

    #[test]
    fn outcome_follows_result() {
        assert_eq!(Outcome::of(&Ok::<(), ()>(())), Outcome::Success);
        assert_eq!(Outcome::of(&Err::<(), ()>(())), Outcome::Error);
    }
}
