//! Inventory client errors.

use thiserror::Error;

use crate::domain::orders::models::ProductId;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    #[error("product service returned status {0}")]
    Status(u16),

    #[error("product service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected product payload: {0}")]
    InvalidPayload(String),
}
