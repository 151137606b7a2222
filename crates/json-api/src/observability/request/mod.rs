//! Request-level logging, request IDs, and parent trace extraction.

mod parent_context;
mod request_ids;
mod spans;

use std::{sync::Arc, time::Instant};

use salvo::{
    Request, handler,
    prelude::{Depot, FlowCtrl, Response},
};
use tracing::Instrument as _;
use tracing::{error, info, warn};
use tracing_opentelemetry::OpenTelemetrySpanExt as _;

use crate::state::State;

const REQUEST_ID_DEPOT_KEY: &str = "request_id";

#[handler]
pub(crate) async fn request_logging(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(state) = depot.obtain::<Arc<State>>().ok().cloned() else {
        ctrl.call_next(req, depot, res).await;
        return;
    };

    if req.uri().path() == "/metrics" {
        ctrl.call_next(req, depot, res).await;
        return;
    }

    let started = Instant::now();

    let request_id =
        request_ids::resolve_request_id(req.header::<String>(request_ids::REQUEST_ID_HEADER));

    depot.insert(REQUEST_ID_DEPOT_KEY, request_id.clone());

    request_ids::set_request_id_header(res, &request_id);

    let method = req.method().to_string();
    let path = req.uri().path().to_owned();
    let remote_addr = req.remote_addr().to_string();
    let names = spans::request_span_name(&method, &path);
    let route = names.route;
    let otel_span_name = names.otel_span_name;
    let _in_flight_request = state.metrics.track_in_flight();

    let span = tracing::info_span!(
        parent: None,
        "http.request",
        otel.name = %otel_span_name,
        otel.kind = "server",
        request_id = %request_id,
        method = %method,
        path = %path,
        http.route = %route,
        remote_addr = %remote_addr,
        status = tracing::field::Empty,
        duration_ms = tracing::field::Empty
    );

    if state.settings.parent_propagation_enabled
        && let Some(parent_context) = parent_context::extract_parent_context(req.headers())
        && let Err(source) = span.set_parent(parent_context)
    {
        warn!("failed to set parent context on request span: {source}");
    }

    ctrl.call_next(req, depot, res)
        .instrument(span.clone())
        .await;

    let duration = started.elapsed();
    let status = request_ids::response_status_or_ok(res.status_code);
    let duration_ms = duration.as_millis();
    let threshold_ms = u128::from(state.settings.slow_request_threshold_ms);

    state
        .metrics
        .observe_request(&method, &route, status.as_u16(), duration.as_secs_f64());

    span.record("status", status.as_u16());
    span.record("duration_ms", duration_ms);

    span.in_scope(|| {
        info!(status = status.as_u16(), duration_ms, "request.completed");

        if status.is_server_error() {
            error!(
                status = status.as_u16(),
                method = %method,
                path = %path,
                request_id = %request_id,
                "server error response"
            );
        } else if status.is_client_error() {
            warn!(
                status = status.as_u16(),
                method = %method,
                path = %path,
                request_id = %request_id,
                "client error response"
            );
        }

        if duration_ms > threshold_ms {
            warn!(
                method = %method,
                path = %path,
                request_id = %request_id,
                duration_ms,
                threshold_ms,
                "slow request detected"
            );
        }
    });
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use salvo::{affix_state::inject, prelude::*, test::TestClient};
    use testresult::TestResult;

    use orders_app::domain::orders::MockOrdersService;

    use crate::{observability::Metrics, test_helpers::state_with_metrics};

    use super::*;

    #[handler]
    async fn ok() -> &'static str {
        "ok"
    }

    fn make_service(metrics: Arc<Metrics>) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(state_with_metrics(MockOrdersService::new(), metrics)))
                .hoop(request_logging)
                .push(Router::with_path("orders/{id}").get(ok)),
        )
    }

    #[tokio::test]
    async fn echoes_a_supplied_request_id() -> TestResult {
        let res = TestClient::get("http://example.com/orders/abc")
            .add_header(request_ids::REQUEST_ID_HEADER, "req-123", true)
            .send(&make_service(Arc::new(Metrics::new()?)))
            .await;

        let echoed = res
            .headers()
            .get(request_ids::REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok());

        assert_eq!(echoed, Some("req-123"), "request id echoed");

        Ok(())
    }

    #[tokio::test]
    async fn generates_a_request_id_when_missing() -> TestResult {
        let res = TestClient::get("http://example.com/orders/abc")
            .send(&make_service(Arc::new(Metrics::new()?)))
            .await;

        let generated = res
            .headers()
            .get(request_ids::REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(uuid::Uuid::parse_str);

        assert!(matches!(generated, Some(Ok(_))), "uuid request id generated");

        Ok(())
    }

    #[tokio::test]
    async fn requests_are_counted_under_their_route_template() -> TestResult {
        let metrics = Arc::new(Metrics::new()?);
        let id = uuid::Uuid::now_v7();

        TestClient::get(format!("http://example.com/orders/{id}"))
            .send(&make_service(Arc::clone(&metrics)))
            .await;

        let (body, _) = metrics.encode()?;

        assert!(
            body.contains(r#"route="/orders/{id}""#),
            "uuid segment replaced in route label"
        );

        Ok(())
    }
}
