//! Order Errors

use salvo::{
    http::StatusCode,
    oapi::ToSchema,
    prelude::{Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

use orders_app::domain::orders::OrdersServiceError;

/// Error Response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct ErrorResponse {
    /// What went wrong
    pub error: String,

    /// Units in stock, when stock was insufficient
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<i32>,

    /// Units requested, when stock was insufficient
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested: Option<i32>,
}

/// An error response ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    pub(crate) fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error: message.into(),
                available: None,
                requested: None,
            },
        }
    }

    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub(crate) fn order_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Order not found")
    }

    /// Write the body, returning the status the handler should respond with.
    pub(crate) fn render(self, res: &mut Response) -> StatusCode {
        res.render(Json(self.body));

        self.status
    }
}

/// Map a service error onto its response, logging internal detail under `context`.
pub(crate) fn into_api_error(error: OrdersServiceError, context: &str) -> ApiError {
    match error {
        OrdersServiceError::Validation(message) => ApiError::bad_request(message),
        OrdersServiceError::InsufficientStock {
            requested,
            available,
        } => ApiError {
            status: StatusCode::BAD_REQUEST,
            body: ErrorResponse {
                error: "Insufficient stock".to_owned(),
                available: Some(available),
                requested: Some(requested),
            },
        },
        OrdersServiceError::NotFound => ApiError::order_not_found(),
        OrdersServiceError::ProductNotFound(_) => {
            ApiError::new(StatusCode::NOT_FOUND, "Product not found")
        }
        source @ (OrdersServiceError::InventoryUnavailable(_)
        | OrdersServiceError::ProductServiceStatus(_)) => {
            error!("{context}: {source}");

            ApiError::new(StatusCode::BAD_GATEWAY, "Product service unavailable")
        }
        source @ (OrdersServiceError::DuplicateId | OrdersServiceError::Persistence(_)) => {
            error!("{context}: {source:?}");

            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, context)
        }
    }
}
