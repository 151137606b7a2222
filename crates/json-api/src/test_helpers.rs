//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::{affix_state::inject, prelude::*};
use testresult::TestResult;

use orders_app::{
    context::AppContext,
    domain::orders::{
        MockOrdersService,
        models::{Order, OrderUuid, ProductId},
        status::OrderStatus,
    },
};

use crate::{
    observability::{Metrics, RequestSettings},
    state::{ServiceInfo, State},
};

pub(crate) fn make_order(uuid: OrderUuid) -> Order {
    Order {
        uuid,
        user_id: "u1".to_owned(),
        product_id: ProductId::new(42),
        quantity: 3,
        total_price: Decimal::new(3000, 2),
        status: OrderStatus::Pending,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn state_with_metrics(orders: MockOrdersService, metrics: Arc<Metrics>) -> Arc<State> {
    State::new(
        AppContext {
            orders: Arc::new(orders),
        },
        metrics,
        RequestSettings::default(),
        ServiceInfo {
            name: "order-service".to_owned(),
            version: "1.0.0".to_owned(),
        },
    )
    .into_shared()
}

pub(crate) fn orders_service(orders: MockOrdersService, route: Router) -> TestResult<Service> {
    Ok(Service::new(
        Router::new()
            .hoop(inject(state_with_metrics(
                orders,
                Arc::new(Metrics::new()?),
            )))
            .push(route),
    ))
}
