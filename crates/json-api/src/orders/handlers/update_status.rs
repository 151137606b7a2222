//! Update Order Status Handler

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};

use crate::{
    extensions::*,
    orders::{
        ErrorResponse, MessageResponse, UpdateOrderStatusRequest, into_api_error,
        parse_order_id,
    },
};

/// Update Order Status Handler
///
/// Overwrites the status of an order. Any known status is accepted.
#[endpoint(
    tags("orders"),
    summary = "Update Order Status",
    responses(
        (status_code = StatusCode::OK, description = "Status updated", body = MessageResponse),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid status", body = ErrorResponse),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found", body = ErrorResponse),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error", body = ErrorResponse),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    json: JsonBody<UpdateOrderStatusRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<StatusCode, StatusError> {
    let state = depot.state()?;

    let uuid = match parse_order_id(&id.into_inner()) {
        Ok(uuid) => uuid,
        Err(error) => return Ok(error.render(res)),
    };

    let status = match state
        .app
        .orders
        .update_order_status(uuid, &json.into_inner().status)
        .await
    {
        Ok(()) => {
            res.render(Json(MessageResponse {
                message: "Order status updated successfully".to_owned(),
            }));

            StatusCode::OK
        }
        Err(error) => into_api_error(error, "Failed to update order status").render(res),
    };

    Ok(status)
}
