//! Order Service Healthcheck Handler

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use orders_app::domain::orders::HealthStatus;

use crate::extensions::*;

/// Healthcheck response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct HealthResponse {
    /// `healthy` or `unhealthy`
    pub status: String,

    /// Service name
    pub service: String,

    /// Service version, reported while healthy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Order store connectivity, reported while healthy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// Cause of the failure, reported while unhealthy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Healthcheck handler
///
/// Probes the order store.
#[endpoint(
    tags("health"),
    summary = "Health check endpoint",
    responses(
        (status_code = StatusCode::OK, description = "Service healthy", body = HealthResponse),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Service unhealthy", body = HealthResponse),
    ),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
    res: &mut Response,
) -> Result<StatusCode, StatusError> {
    let state = depot.state()?;
    let service = state.service.name.clone();

    let (status, body) = match state.app.orders.health_check().await {
        HealthStatus::Healthy => (
            StatusCode::OK,
            HealthResponse {
                status: "healthy".to_owned(),
                service,
                version: Some(state.service.version.clone()),
                database: Some("connected".to_owned()),
                error: None,
            },
        ),
        HealthStatus::Unhealthy(cause) => (
            StatusCode::SERVICE_UNAVAILABLE,
            HealthResponse {
                status: "unhealthy".to_owned(),
                service,
                version: None,
                database: None,
                error: Some(cause),
            },
        ),
    };

    res.render(Json(body));

    Ok(status)
}
