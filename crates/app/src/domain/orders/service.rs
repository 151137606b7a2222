//! Orders service.

use std::{sync::Arc, time::Instant};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{Span, error, field, info, warn};

use crate::{
    domain::{
        inventory::{InventoryClient, ProductSnapshot},
        orders::{
            data::{NewOrder, OrderFilter, OrderPage, Pagination},
            errors::OrdersServiceError,
            models::{Order, OrderUuid},
            repositories::OrdersRepository,
            status::OrderStatus,
        },
    },
    telemetry::{Operation, Outcome, Telemetry},
};

/// Decimal places `total_price` is stored with.
pub const PRICE_SCALE: u32 = 2;

/// Largest total the order store can hold (`NUMERIC(10, 2)`), `99999999.99`.
pub const MAX_TOTAL_PRICE: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Result of probing the order store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Unhealthy(String),
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Validate, price and persist a new pending order.
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError>;

    /// Retrieve a single order.
    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError>;

    /// Retrieve a page of orders, most recent first.
    async fn list_orders(
        &self,
        filter: OrderFilter,
        pagination: Pagination,
    ) -> Result<OrderPage, OrdersServiceError>;

    /// Overwrite the status of an order.
    ///
    /// Any known status is accepted regardless of the current one.
    async fn update_order_status(
        &self,
        order: OrderUuid,
        status: &str,
    ) -> Result<(), OrdersServiceError>;

    /// Probe the order store.
    async fn health_check(&self) -> HealthStatus;
}

/// [`OrdersService`] orchestrating an order store, the inventory and telemetry.
#[derive(Clone)]
pub struct OrdersWorkflow {
    repository: Arc<dyn OrdersRepository>,
    inventory: Arc<dyn InventoryClient>,
    telemetry: Arc<dyn Telemetry>,
}

impl OrdersWorkflow {
    #[must_use]
    pub fn new(
        repository: Arc<dyn OrdersRepository>,
        inventory: Arc<dyn InventoryClient>,
        telemetry: Arc<dyn Telemetry>,
    ) -> Self {
        Self {
            repository,
            inventory,
            telemetry,
        }
    }

    async fn create(&self, new_order: NewOrder) -> Result<Order, OrdersServiceError> {
        new_order.validate()?;

        let snapshot = self.inventory.fetch_product(new_order.product_id).await?;

        if new_order.quantity > snapshot.available_stock {
            return Err(OrdersServiceError::InsufficientStock {
                requested: new_order.quantity,
                available: snapshot.available_stock,
            });
        }

        let total_price = total_price(&snapshot, new_order.quantity)?;
        let now = Timestamp::now();

        let order = self
            .repository
            .insert(Order {
                uuid: OrderUuid::new(),
                user_id: new_order.user_id,
                product_id: new_order.product_id,
                quantity: new_order.quantity,
                total_price,
                status: OrderStatus::Pending,
                created_at: now,
                updated_at: now,
            })
            .await?;

        let span = Span::current();
        span.record("order.id", field::display(order.uuid));
        span.record("order.total_price", field::display(order.total_price));
        span.record("order.status", order.status.as_str());

        self.telemetry.record_order_created();

        info!(
            order.id = %order.uuid,
            user.id = %order.user_id,
            product.id = order.product_id.get(),
            order.total_price = %order.total_price,
            "order created"
        );

        Ok(order)
    }

    async fn get(&self, uuid: OrderUuid) -> Result<Order, OrdersServiceError> {
        let order = self
            .repository
            .find_by_id(uuid)
            .await?
            .ok_or(OrdersServiceError::NotFound)?;

        let span = Span::current();
        span.record("user.id", order.user_id.as_str());
        span.record("order.status", order.status.as_str());

        Ok(order)
    }

    async fn list(
        &self,
        filter: OrderFilter,
        pagination: Pagination,
    ) -> Result<OrderPage, OrdersServiceError> {
        let orders = self.repository.query(&filter, pagination).await?;

        let page = OrderPage { orders, pagination };

        Span::current().record("orders.count", page.total_returned());

        info!(count = page.total_returned(), "retrieved orders");

        Ok(page)
    }

    async fn update_status(&self, uuid: OrderUuid, status: &str) -> Result<(), OrdersServiceError> {
        if status.trim().is_empty() {
            return Err(OrdersServiceError::Validation(
                "status must not be empty".to_owned(),
            ));
        }

        let next = status
            .parse::<OrderStatus>()
            .map_err(|error| OrdersServiceError::Validation(error.to_string()))?;

        let current = self
            .repository
            .find_by_id(uuid)
            .await?
            .ok_or(OrdersServiceError::NotFound)?;

        let span = Span::current();
        span.record("order.previous_status", current.status.as_str());

        if !current.status.is_workflow_transition(next) {
            warn!(
                order.id = %uuid,
                from = %current.status,
                to = %next,
                "status change outside the order workflow"
            );
        }

        let rows_affected = self
            .repository
            .update_status(uuid, next, Timestamp::now())
            .await?;

        if rows_affected == 0 {
            return Err(OrdersServiceError::NotFound);
        }

        info!(order.id = %uuid, status = %next, "updated order status");

        Ok(())
    }

    fn observe<T>(
        &self,
        operation: Operation,
        started: Instant,
        result: &Result<T, OrdersServiceError>,
    ) {
        self.telemetry.record_request(operation, Outcome::of(result));
        self.telemetry.record_duration(operation, started.elapsed());

        let Err(failure) = result else {
            return;
        };

        let span = Span::current();
        span.record("error.type", failure.kind());
        span.record("otel.status_code", "ERROR");

        if failure.is_internal() {
            error!(error = ?failure, kind = failure.kind(), "order operation failed");
        } else {
            info!(error = %failure, kind = failure.kind(), "order request rejected");
        }
    }
}

/// `unit_price * quantity`, rounded half away from zero to [`PRICE_SCALE`].
///
/// Totals the order store cannot hold are rejected as invalid requests.
fn total_price(snapshot: &ProductSnapshot, quantity: i32) -> Result<Decimal, OrdersServiceError> {
    snapshot
        .unit_price
        .checked_mul(Decimal::from(quantity))
        .map(|total| {
            total.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero)
        })
        .filter(|total| *total <= MAX_TOTAL_PRICE)
        .ok_or_else(|| {
            OrdersServiceError::Validation(format!(
                "order total must not exceed {MAX_TOTAL_PRICE}"
            ))
        })
}

#[async_trait]
impl OrdersService for OrdersWorkflow {
    #[tracing::instrument(
        name = "orders.create",
        skip_all,
        fields(
            user.id = %order.user_id,
            product.id = order.product_id.get(),
            order.quantity = order.quantity,
            order.id = field::Empty,
            order.total_price = field::Empty,
            order.status = field::Empty,
            error.type = field::Empty,
            otel.status_code = field::Empty,
        )
    )]
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError> {
        let started = Instant::now();

        let result = self.create(order).await;

        self.observe(Operation::CreateOrder, started, &result);

        result
    }

    #[tracing::instrument(
        name = "orders.get",
        skip_all,
        fields(
            order.id = %order,
            user.id = field::Empty,
            order.status = field::Empty,
            error.type = field::Empty,
            otel.status_code = field::Empty,
        )
    )]
    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        let started = Instant::now();

        let result = self.get(order).await;

        self.observe(Operation::GetOrder, started, &result);

        result
    }

    #[tracing::instrument(
        name = "orders.list",
        skip_all,
        fields(
            filter.user_id = filter.user_id.as_deref(),
            filter.status = filter.status.map(OrderStatus::as_str),
            pagination.limit = pagination.limit,
            pagination.offset = pagination.offset,
            orders.count = field::Empty,
            error.type = field::Empty,
            otel.status_code = field::Empty,
        )
    )]
    async fn list_orders(
        &self,
        filter: OrderFilter,
        pagination: Pagination,
    ) -> Result<OrderPage, OrdersServiceError> {
        let started = Instant::now();

        let result = self.list(filter, pagination).await;

        self.observe(Operation::ListOrders, started, &result);

        result
    }

    #[tracing::instrument(
        name = "orders.update_status",
        skip_all,
        fields(
            order.id = %order,
            order.status = status,
            order.previous_status = field::Empty,
            error.type = field::Empty,
            otel.status_code = field::Empty,
        )
    )]
    async fn update_order_status(
        &self,
        order: OrderUuid,
        status: &str,
    ) -> Result<(), OrdersServiceError> {
        let started = Instant::now();

        let result = self.update_status(order, status).await;

        self.observe(Operation::UpdateOrderStatus, started, &result);

        result
    }

    async fn health_check(&self) -> HealthStatus {
        match self.repository.ping().await {
            Ok(()) => HealthStatus::Healthy,
            Err(error) => {
                warn!(error = %error, "order store health check failed");

                HealthStatus::Unhealthy(error.to_string())
            }
        }
    }
}
