//! Postgres Orders Repository

use async_trait::async_trait;
use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query, query_as};

use crate::domain::orders::{
    data::{OrderFilter, Pagination},
    models::{Order, OrderUuid, ProductId},
    status::OrderStatus,
};

use super::{OrdersRepository, OrdersRepositoryError};

const INSERT_ORDER_SQL: &str = include_str!("../sql/insert_order.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const LIST_ORDERS_SQL: &str = include_str!("../sql/list_orders.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("../sql/update_order_status.sql");

#[derive(Debug, Clone)]
pub struct PgOrdersRepository {
    pool: PgPool,
}

impl PgOrdersRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrdersRepository for PgOrdersRepository {
    async fn insert(&self, order: Order) -> Result<Order, OrdersRepositoryError> {
        query_as::<Postgres, Order>(INSERT_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(&order.user_id)
            .bind(order.product_id.get())
            .bind(order.quantity)
            .bind(order.total_price)
            .bind(order.status.as_str())
            .bind(SqlxTimestamp::from(order.created_at))
            .bind(SqlxTimestamp::from(order.updated_at))
            .fetch_one(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn find_by_id(&self, uuid: OrderUuid) -> Result<Option<Order>, OrdersRepositoryError> {
        query_as::<Postgres, Order>(GET_ORDER_SQL)
            .bind(uuid.into_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn query(
        &self,
        filter: &OrderFilter,
        pagination: Pagination,
    ) -> Result<Vec<Order>, OrdersRepositoryError> {
        query_as::<Postgres, Order>(LIST_ORDERS_SQL)
            .bind(filter.user_id.as_deref())
            .bind(filter.status.map(OrderStatus::as_str))
            .bind(i64::from(pagination.limit))
            .bind(i64::from(pagination.offset))
            .fetch_all(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn update_status(
        &self,
        uuid: OrderUuid,
        status: OrderStatus,
        updated_at: Timestamp,
    ) -> Result<u64, OrdersRepositoryError> {
        let rows_affected = query(UPDATE_ORDER_STATUS_SQL)
            .bind(uuid.into_uuid())
            .bind(status.as_str())
            .bind(SqlxTimestamp::from(updated_at))
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    async fn ping(&self) -> Result<(), OrdersRepositoryError> {
        query("SELECT 1").execute(&self.pool).await?;

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status = row
            .try_get::<String, _>("status")?
            .parse::<OrderStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("id")?),
            user_id: row.try_get("user_id")?,
            product_id: ProductId::new(row.try_get("product_id")?),
            quantity: row.try_get("quantity")?,
            total_price: row.try_get("total_price")?,
            status,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
