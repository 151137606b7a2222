//! Orders service errors.

use thiserror::Error;

use crate::domain::{
    inventory::InventoryError,
    orders::{models::ProductId, repositories::OrdersRepositoryError},
};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("order not found")]
    NotFound,

    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: i32, available: i32 },

    #[error("product service unavailable")]
    InventoryUnavailable(#[source] InventoryError),

    #[error("product service returned status {0}")]
    ProductServiceStatus(u16),

    #[error("order id already exists")]
    DuplicateId,

    #[error("storage error")]
    Persistence(#[source] OrdersRepositoryError),
}

impl OrdersServiceError {
    /// Short machine-readable classification recorded on spans.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound => "not_found",
            Self::ProductNotFound(_) => "product_not_found",
            Self::InsufficientStock { .. } => "insufficient_stock",
            Self::InventoryUnavailable(_) => "inventory_unavailable",
            Self::ProductServiceStatus(_) => "product_service_status",
            Self::DuplicateId => "duplicate_id",
            Self::Persistence(_) => "persistence",
        }
    }

    /// Whether the failure lies with a dependency rather than the request.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::InventoryUnavailable(_)
                | Self::ProductServiceStatus(_)
                | Self::DuplicateId
                | Self::Persistence(_)
        )
    }
}

impl From<OrdersRepositoryError> for OrdersServiceError {
    fn from(error: OrdersRepositoryError) -> Self {
        match error {
            OrdersRepositoryError::DuplicateId => Self::DuplicateId,
            other @ OrdersRepositoryError::Sql(_) => Self::Persistence(other),
        }
    }
}

impl From<InventoryError> for OrdersServiceError {
    fn from(error: InventoryError) -> Self {
        match error {
            InventoryError::ProductNotFound(product) => Self::ProductNotFound(product),
            InventoryError::Status(code) => Self::ProductServiceStatus(code),
            other @ (InventoryError::Transport(_) | InventoryError::InvalidPayload(_)) => {
                Self::InventoryUnavailable(other)
            }
        }
    }
}
