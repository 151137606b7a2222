//! Inventory Models

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{inventory::errors::InventoryError, orders::models::ProductId};

/// Point-in-time price and stock of a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSnapshot {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub available_stock: i32,
}

/// Product as served by the product service.
#[derive(Debug, Deserialize)]
pub(crate) struct ProductPayload {
    pub id: i32,

    #[serde(default)]
    pub name: String,

    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    pub stock_quantity: i32,
}

impl ProductPayload {
    pub(crate) fn into_snapshot(self, requested: ProductId) -> Result<ProductSnapshot, InventoryError> {
        if self.id != requested.get() {
            return Err(InventoryError::InvalidPayload(format!(
                "asked for product {requested}, got {}",
                self.id
            )));
        }

        if self.price.is_sign_negative() {
            return Err(InventoryError::InvalidPayload(format!(
                "negative price {}",
                self.price
            )));
        }

        if self.stock_quantity < 0 {
            return Err(InventoryError::InvalidPayload(format!(
                "negative stock {}",
                self.stock_quantity
            )));
        }

        Ok(ProductSnapshot {
            product_id: requested,
            name: self.name,
            unit_price: self.price,
            available_stock: self.stock_quantity,
        })
    }
}
