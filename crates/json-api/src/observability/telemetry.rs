//! Telemetry port backed by Prometheus and the W3C trace propagator.

use std::{collections::HashMap, time::Duration};

use opentelemetry::propagation::TextMapPropagator as _;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt as _;

use orders_app::telemetry::{Operation, Outcome, Telemetry, TraceContext};

use super::metrics::{Metrics, OrderMetrics};

/// [`Telemetry`] recording into the process [`Metrics`].
#[derive(Debug, Clone)]
pub(crate) struct PrometheusTelemetry {
    metrics: OrderMetrics,
    propagator: TraceContextPropagator,
}

impl PrometheusTelemetry {
    pub(crate) fn new(metrics: &Metrics) -> Self {
        Self {
            metrics: metrics.orders().clone(),
            propagator: TraceContextPropagator::new(),
        }
    }
}

impl Telemetry for PrometheusTelemetry {
    fn record_request(&self, operation: Operation, outcome: Outcome) {
        self.metrics
            .requests_total
            .with_label_values(&[operation.method(), operation.endpoint(), outcome.as_str()])
            .inc();
    }

    fn record_duration(&self, operation: Operation, duration: Duration) {
        self.metrics
            .request_duration_seconds
            .with_label_values(&[operation.method(), operation.endpoint()])
            .observe(duration.as_secs_f64());
    }

    fn record_order_created(&self) {
        self.metrics.orders_total.inc();
    }

    fn trace_context(&self, span: &Span) -> TraceContext {
        let context = span.context();
        let mut headers = HashMap::new();

        self.propagator.inject_context(&context, &mut headers);

        TraceContext::from(headers)
    }
}
