//! Order Store

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::orders::{
    data::{OrderFilter, Pagination},
    models::{Order, OrderUuid},
    status::OrderStatus,
};

mod memory;
mod postgres;

pub use memory::InMemoryOrdersRepository;
pub use postgres::PgOrdersRepository;

#[derive(Debug, Error)]
pub enum OrdersRepositoryError {
    #[error("order id already exists")]
    DuplicateId,

    #[error("storage error: {0}")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersRepositoryError {
    fn from(error: Error) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::DuplicateId,
            Some(_) | None => Self::Sql(error),
        }
    }
}

/// Persistence contract for orders.
///
/// Implementations must be safe to share between concurrent requests.
#[automock]
#[async_trait]
pub trait OrdersRepository: Send + Sync {
    /// Persist a new order, rejecting an id that is already stored.
    async fn insert(&self, order: Order) -> Result<Order, OrdersRepositoryError>;

    /// Fetch a single order.
    async fn find_by_id(&self, uuid: OrderUuid) -> Result<Option<Order>, OrdersRepositoryError>;

    /// Filter, order (most recent first) and paginate inside the store.
    async fn query(
        &self,
        filter: &OrderFilter,
        pagination: Pagination,
    ) -> Result<Vec<Order>, OrdersRepositoryError>;

    /// Overwrite the status of an order, returning the number of matched rows.
    async fn update_status(
        &self,
        uuid: OrderUuid,
        status: OrderStatus,
        updated_at: Timestamp,
    ) -> Result<u64, OrdersRepositoryError>;

    /// Probe connectivity to the underlying storage.
    async fn ping(&self) -> Result<(), OrdersRepositoryError>;
}
