//! In-memory Orders Repository

use std::{cmp::Reverse, collections::HashMap};

use async_trait::async_trait;
use jiff::Timestamp;
use tokio::sync::RwLock;

use crate::domain::orders::{
    data::{OrderFilter, Pagination},
    models::{Order, OrderUuid},
    status::OrderStatus,
};

use super::{OrdersRepository, OrdersRepositoryError};

#[derive(Debug, Default)]
struct Rows {
    next_seq: u64,
    orders: HashMap<OrderUuid, (u64, Order)>,
}

/// Process-local order store with the same contract as the Postgres one.
#[derive(Debug, Default)]
pub struct InMemoryOrdersRepository {
    rows: RwLock<Rows>,
}

impl InMemoryOrdersRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrdersRepository for InMemoryOrdersRepository {
    async fn insert(&self, order: Order) -> Result<Order, OrdersRepositoryError> {
        let mut rows = self.rows.write().await;

        if rows.orders.contains_key(&order.uuid) {
            return Err(OrdersRepositoryError::DuplicateId);
        }

        let seq = rows.next_seq;

        rows.next_seq += 1;
        rows.orders.insert(order.uuid, (seq, order.clone()));

        Ok(order)
    }

    async fn find_by_id(&self, uuid: OrderUuid) -> Result<Option<Order>, OrdersRepositoryError> {
        let rows = self.rows.read().await;

        Ok(rows.orders.get(&uuid).map(|(_, order)| order.clone()))
    }

    async fn query(
        &self,
        filter: &OrderFilter,
        pagination: Pagination,
    ) -> Result<Vec<Order>, OrdersRepositoryError> {
        let rows = self.rows.read().await;

        let mut matching: Vec<&(u64, Order)> = rows
            .orders
            .values()
            .filter(|(_, order)| filter.matches(order))
            .collect();

        matching.sort_by_key(|(seq, order)| (Reverse(order.created_at), *seq));

        Ok(matching
            .into_iter()
            .skip(pagination.offset as usize)
            .take(pagination.limit as usize)
            .map(|(_, order)| order.clone())
            .collect())
    }

    async fn update_status(
        &self,
        uuid: OrderUuid,
        status: OrderStatus,
        updated_at: Timestamp,
    ) -> Result<u64, OrdersRepositoryError> {
        let mut rows = self.rows.write().await;

        let Some((_, order)) = rows.orders.get_mut(&uuid) else {
            return Ok(0);
        };

        order.status = status;
        order.updated_at = updated_at.max(order.created_at);

        Ok(1)
    }

    async fn ping(&self) -> Result<(), OrdersRepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::domain::orders::models::ProductId;

    use super::*;

    fn make_order(user_id: &str, status: OrderStatus, created_at: Timestamp) -> Order {
        Order {
            uuid: OrderUuid::new(),
            user_id: user_id.to_owned(),
            product_id: ProductId::new(1),
            quantity: 1,
            total_price: Decimal::ONE,
            status,
            created_at,
            updated_at: created_at,
        }
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_id_without_overwriting() -> TestResult {
        let repository = InMemoryOrdersRepository::new();
        let original = make_order("u1", OrderStatus::Pending, Timestamp::now());

        let mut collision = original.clone();
        collision.user_id = "u2".to_owned();

        repository.insert(original.clone()).await?;

        let result = repository.insert(collision).await;

        assert!(matches!(result, Err(OrdersRepositoryError::DuplicateId)));
        assert_eq!(repository.find_by_id(original.uuid).await?, Some(original));

        Ok(())
    }

    #[tokio::test]
    async fn query_orders_newest_first_and_keeps_insertion_order_on_ties() -> TestResult {
        let repository = InMemoryOrdersRepository::new();
        let base = Timestamp::now();
        let newest_at = base + SignedDuration::from_secs(10);

        let old = repository
            .insert(make_order("u1", OrderStatus::Pending, base))
            .await?;
        let tie_first = repository
            .insert(make_order("u1", OrderStatus::Pending, newest_at))
            .await?;
        let tie_second = repository
            .insert(make_order("u1", OrderStatus::Pending, newest_at))
            .await?;

        let orders = repository
            .query(&OrderFilter::default(), Pagination::default())
            .await?;

        assert_eq!(orders, vec![tie_first, tie_second, old]);

        Ok(())
    }

    #[tokio::test]
    async fn query_applies_both_filters_and_window() -> TestResult {
        let repository = InMemoryOrdersRepository::new();
        let base = Timestamp::now();

        for (offset, user_id, status) in [
            (0, "u1", OrderStatus::Pending),
            (1, "u1", OrderStatus::Confirmed),
            (2, "u2", OrderStatus::Confirmed),
            (3, "u1", OrderStatus::Confirmed),
        ] {
            repository
                .insert(make_order(
                    user_id,
                    status,
                    base + SignedDuration::from_secs(offset),
                ))
                .await?;
        }

        let filter = OrderFilter {
            user_id: Some("u1".to_owned()),
            status: Some(OrderStatus::Confirmed),
        };

        let all = repository
            .query(&filter, Pagination { limit: 10, offset: 0 })
            .await?;
        let window = repository
            .query(&filter, Pagination { limit: 1, offset: 1 })
            .await?;

        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|order| filter.matches(order)));
        assert_eq!(window, all.get(1..).map(<[Order]>::to_vec).unwrap_or_default());

        Ok(())
    }

    #[tokio::test]
    async fn update_status_on_unknown_id_matches_nothing() -> TestResult {
        let repository = InMemoryOrdersRepository::new();

        let matched = repository
            .update_status(OrderUuid::new(), OrderStatus::Failed, Timestamp::now())
            .await?;

        assert_eq!(matched, 0);

        Ok(())
    }
}
