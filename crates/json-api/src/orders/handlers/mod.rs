//! Order Handlers

pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod update_status;

use orders_app::domain::orders::models::OrderUuid;
use uuid::Uuid;

use crate::orders::ApiError;

/// Parse an order id from the path; an id that is not a UUID cannot exist.
pub(crate) fn parse_order_id(raw: &str) -> Result<OrderUuid, ApiError> {
    Uuid::parse_str(raw)
        .map(OrderUuid::from)
        .map_err(|_ignored| ApiError::order_not_found())
}
