//! Prometheus metrics collection and exposition endpoint.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use salvo::{
    Depot, Response, handler,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, HeaderValue},
    },
};
use tracing::error;

use crate::extensions::*;

const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

#[derive(Debug, Clone)]
struct HttpMetrics {
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    requests_in_flight: IntGauge,
}

/// Order service RED metrics fed through the telemetry port.
#[derive(Debug, Clone)]
pub(super) struct OrderMetrics {
    pub(super) requests_total: IntCounterVec,
    pub(super) request_duration_seconds: HistogramVec,
    pub(super) orders_total: IntCounter,
}

/// Every metric the service exposes, and the registry they live in.
#[derive(Debug, Clone)]
pub(crate) struct Metrics {
    registry: Registry,
    http: HttpMetrics,
    orders: OrderMetrics,
}

impl Metrics {
    /// Create and register all metrics in a fresh registry.
    pub(crate) fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http = HttpMetrics {
            requests_total: IntCounterVec::new(
                Opts::new(
                    "order_service_http_requests_total",
                    "Total HTTP requests partitioned by method, route, status class, and status code.",
                ),
                &["method", "route", "status_class", "status_code"],
            )?,
            request_duration_seconds: HistogramVec::new(
                HistogramOpts::new(
                    "order_service_http_request_duration_seconds",
                    "HTTP request duration in seconds partitioned by method and route.",
                )
                .buckets(LATENCY_BUCKETS.to_vec()),
                &["method", "route"],
            )?,
            requests_in_flight: IntGauge::with_opts(Opts::new(
                "order_service_http_requests_in_flight",
                "Current number of in-flight HTTP requests.",
            ))?,
        };

        let orders = OrderMetrics {
            requests_total: IntCounterVec::new(
                Opts::new(
                    "order_service_requests_total",
                    "Order operations partitioned by method, endpoint, and outcome.",
                ),
                &["method", "endpoint", "outcome"],
            )?,
            request_duration_seconds: HistogramVec::new(
                HistogramOpts::new(
                    "order_service_request_duration_seconds",
                    "Order operation duration in seconds partitioned by method and endpoint.",
                )
                .buckets(LATENCY_BUCKETS.to_vec()),
                &["method", "endpoint"],
            )?,
            orders_total: IntCounter::with_opts(Opts::new(
                "orders_total",
                "Total number of orders created.",
            ))?,
        };

        registry.register(Box::new(http.requests_total.clone()))?;
        registry.register(Box::new(http.request_duration_seconds.clone()))?;
        registry.register(Box::new(http.requests_in_flight.clone()))?;
        registry.register(Box::new(orders.requests_total.clone()))?;
        registry.register(Box::new(orders.request_duration_seconds.clone()))?;
        registry.register(Box::new(orders.orders_total.clone()))?;

        Ok(Self {
            registry,
            http,
            orders,
        })
    }

    pub(super) fn orders(&self) -> &OrderMetrics {
        &self.orders
    }

    pub(super) fn track_in_flight(&self) -> InFlightRequestGuard {
        self.http.requests_in_flight.inc();

        InFlightRequestGuard {
            gauge: self.http.requests_in_flight.clone(),
        }
    }

    pub(super) fn observe_request(
        &self,
        method: &str,
        route: &str,
        status_code: u16,
        duration_seconds: f64,
    ) {
        let status_class = status_class(status_code);
        let status_code = status_code.to_string();

        self.http
            .requests_total
            .with_label_values(&[method, route, status_class, status_code.as_str()])
            .inc();

        self.http
            .request_duration_seconds
            .with_label_values(&[method, route])
            .observe(duration_seconds);
    }

    /// Render the registry in the Prometheus text format.
    pub(super) fn encode(&self) -> Result<(String, &'static str), prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut encoded = Vec::new();

        encoder.encode(&self.registry.gather(), &mut encoded)?;

        Ok((
            String::from_utf8_lossy(&encoded).into_owned(),
            prometheus::TEXT_FORMAT,
        ))
    }
}

#[derive(Debug)]
pub(super) struct InFlightRequestGuard {
    gauge: IntGauge,
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        self.gauge.dec();
    }
}

#[handler]
pub(crate) async fn metrics_handler(depot: &mut Depot, res: &mut Response) {
    let Ok(state) = depot.state() else {
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        return;
    };

    let (body, format) = match state.metrics.encode() {
        Ok(encoded) => encoded,
        Err(source) => {
            error!("failed to encode metrics response: {source}");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

            return;
        }
    };

    res.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(format));
    res.render(body);
}

fn status_class(status_code: u16) -> &'static str {
    match status_code {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}
