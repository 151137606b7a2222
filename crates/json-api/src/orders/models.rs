//! Order request and response bodies.

use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use orders_app::domain::orders::{
    data::{NewOrder, OrderPage},
    models::{Order, ProductId},
};

/// Create Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderRequest {
    /// The user placing the order
    pub user_id: String,

    /// The product being ordered
    pub product_id: i32,

    /// How many units to order
    pub quantity: i32,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(request: CreateOrderRequest) -> Self {
        NewOrder {
            user_id: request.user_id,
            product_id: ProductId::new(request.product_id),
            quantity: request.quantity,
        }
    }
}

/// Update Order Status Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateOrderStatusRequest {
    /// One of `pending`, `confirmed`, `cancelled` or `failed`
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    /// The unique identifier of the order
    pub id: Uuid,

    /// The user who placed the order
    pub user_id: String,

    /// The ordered product
    pub product_id: i32,

    /// Units ordered
    pub quantity: i32,

    /// Unit price at creation time multiplied by quantity
    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub total_price: Decimal,

    /// Current status
    pub status: String,

    /// The date and time the order was created
    pub created_at: String,

    /// The date and time the order was last updated
    pub updated_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        OrderResponse {
            id: order.uuid.into(),
            user_id: order.user_id,
            product_id: order.product_id.get(),
            quantity: order.quantity,
            total_price: order.total_price,
            status: order.status.to_string(),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    /// The page of orders, most recent first
    pub orders: Vec<OrderResponse>,

    /// Number of orders in this page
    pub total: usize,

    /// Page size that was applied
    pub limit: u32,

    /// Offset that was applied
    pub offset: u32,
}

impl From<OrderPage> for OrdersResponse {
    fn from(page: OrderPage) -> Self {
        OrdersResponse {
            total: page.total_returned(),
            limit: page.pagination.limit,
            offset: page.pagination.offset,
            orders: page.orders.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MessageResponse {
    pub message: String,
}
