//! Orders Data

use crate::domain::orders::{
    errors::OrdersServiceError,
    models::{Order, ProductId},
    status::OrderStatus,
};

/// Page size used when the caller does not supply one.
pub const DEFAULT_LIMIT: u32 = 10;

/// Longest `user_id` the order store accepts, in characters.
pub const MAX_USER_ID_CHARS: usize = 255;

/// New Order Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub user_id: String,
    pub product_id: ProductId,
    pub quantity: i32,
}

impl NewOrder {
    pub(crate) fn validate(&self) -> Result<(), OrdersServiceError> {
        if self.user_id.trim().is_empty() {
            return Err(OrdersServiceError::Validation(
                "user_id must not be empty".to_owned(),
            ));
        }

        if self.user_id.chars().count() > MAX_USER_ID_CHARS {
            return Err(OrdersServiceError::Validation(format!(
                "user_id must be at most {MAX_USER_ID_CHARS} characters"
            )));
        }

        if self.product_id.get() <= 0 {
            return Err(OrdersServiceError::Validation(
                "product_id must be a positive integer".to_owned(),
            ));
        }

        if self.quantity <= 0 {
            return Err(OrdersServiceError::Validation(
                "quantity must be greater than zero".to_owned(),
            ));
        }

        Ok(())
    }
}

/// Conjunctive filter applied when listing orders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub user_id: Option<String>,
    pub status: Option<OrderStatus>,
}

impl OrderFilter {
    /// Build a filter from raw query values, treating blank values as absent.
    pub fn parse(user_id: Option<&str>, status: Option<&str>) -> Result<Self, OrdersServiceError> {
        let user_id = user_id
            .filter(|value| !value.is_empty())
            .map(ToOwned::to_owned);

        let status = status
            .filter(|value| !value.is_empty())
            .map(str::parse::<OrderStatus>)
            .transpose()
            .map_err(|error| OrdersServiceError::Validation(error.to_string()))?;

        Ok(Self { user_id, status })
    }

    #[must_use]
    pub fn matches(&self, order: &Order) -> bool {
        self.user_id
            .as_deref()
            .is_none_or(|user_id| order.user_id == user_id)
            && self.status.is_none_or(|status| order.status == status)
    }
}

/// Limit/offset window over an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl Pagination {
    /// Parse raw `limit`/`offset` query values.
    pub fn parse(limit: Option<&str>, offset: Option<&str>) -> Result<Self, OrdersServiceError> {
        let limit = parse_non_negative("limit", limit)?.unwrap_or(DEFAULT_LIMIT);
        let offset = parse_non_negative("offset", offset)?.unwrap_or(0);

        Ok(Self { limit, offset })
    }
}

fn parse_non_negative(name: &str, value: Option<&str>) -> Result<Option<u32>, OrdersServiceError> {
    value
        .map(|raw| {
            raw.trim().parse::<u32>().map_err(|_parse_error| {
                OrdersServiceError::Validation(format!("Invalid {name} parameter"))
            })
        })
        .transpose()
}

/// One page of orders, most recent first.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub pagination: Pagination,
}

impl OrderPage {
    /// Number of rows in this page, not the size of the whole result set.
    #[must_use]
    pub fn total_returned(&self) -> usize {
        self.orders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_order(user_id: &str, product_id: i32, quantity: i32) -> NewOrder {
        NewOrder {
            user_id: user_id.to_owned(),
            product_id: ProductId::new(product_id),
            quantity,
        }
    }

    #[test]
    fn valid_new_order_passes() {
        assert!(new_order("u1", 42, 3).validate().is_ok());
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        for quantity in [0, -1, i32::MIN] {
            assert!(
                matches!(
                    new_order("u1", 42, quantity).validate(),
                    Err(OrdersServiceError::Validation(_))
                ),
                "quantity {quantity} should be rejected"
            );
        }
    }

    #[test]
    fn blank_user_and_missing_product_are_rejected() {
        assert!(new_order("  ", 42, 1).validate().is_err());
        assert!(new_order("u1", 0, 1).validate().is_err());
    }

    #[test]
    fn user_id_length_is_bounded_in_characters() {
        assert!(new_order(&"u".repeat(MAX_USER_ID_CHARS), 42, 1).validate().is_ok());
        assert!(new_order(&"é".repeat(MAX_USER_ID_CHARS), 42, 1).validate().is_ok());
        assert!(matches!(
            new_order(&"u".repeat(MAX_USER_ID_CHARS + 1), 42, 1).validate(),
            Err(OrdersServiceError::Validation(_))
        ));
    }

    #[test]
    fn pagination_defaults_when_absent() -> Result<(), OrdersServiceError> {
        assert_eq!(Pagination::parse(None, None)?, Pagination::default());
        assert_eq!(
            Pagination::parse(Some("25"), Some("50"))?,
            Pagination {
                limit: 25,
                offset: 50
            }
        );

        Ok(())
    }

    #[test]
    fn pagination_rejects_negative_and_non_numeric_values() {
        assert!(Pagination::parse(Some("-1"), None).is_err());
        assert!(Pagination::parse(None, Some("ten")).is_err());
        assert!(Pagination::parse(Some(""), None).is_err());
    }

    #[test]
    fn filter_treats_blank_values_as_absent() -> Result<(), OrdersServiceError> {
        assert_eq!(OrderFilter::parse(Some(""), Some(""))?, OrderFilter::default());

        let filter = OrderFilter::parse(Some("u1"), Some("confirmed"))?;

        assert_eq!(filter.user_id.as_deref(), Some("u1"));
        assert_eq!(filter.status, Some(OrderStatus::Confirmed));

        Ok(())
    }

    #[test]
    fn filter_rejects_unknown_status() {
        assert!(matches!(
            OrderFilter::parse(None, Some("shipped")),
            Err(OrdersServiceError::Validation(_))
        ));
    }
}
