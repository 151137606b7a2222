//! Create Order Handler

use salvo::{
    http::header::LOCATION,
    oapi::extract::JsonBody,
    prelude::*,
};
use tracing::warn;

use crate::{
    extensions::*,
    orders::{CreateOrderRequest, ErrorResponse, OrderResponse, into_api_error},
};

/// Create Order Handler
///
/// Checks stock with the product service, prices the order and stores it as pending.
#[endpoint(
    tags("orders"),
    summary = "Create Order",
    responses(
        (status_code = StatusCode::CREATED, description = "Order created", body = OrderResponse),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid request or insufficient stock", body = ErrorResponse),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found", body = ErrorResponse),
        (status_code = StatusCode::BAD_GATEWAY, description = "Product service unavailable", body = ErrorResponse),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error", body = ErrorResponse),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<StatusCode, StatusError> {
    let state = depot.state()?;

    let status = match state.app.orders.create_order(json.into_inner().into()).await {
        Ok(order) => {
            if let Err(source) = res.add_header(LOCATION, format!("/orders/{}", order.uuid), true) {
                warn!("failed to set location header: {source}");
            }

            res.render(Json(OrderResponse::from(order)));

            StatusCode::CREATED
        }
        Err(error) => into_api_error(error, "Failed to create order").render(res),
    };

    Ok(status)
}
