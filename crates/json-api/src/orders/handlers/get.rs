//! Get Order Handler

use salvo::{oapi::extract::PathParam, prelude::*};

use crate::{
    extensions::*,
    orders::{ErrorResponse, OrderResponse, into_api_error, parse_order_id},
};

/// Get Order Handler
///
/// Returns a single order.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    responses(
        (status_code = StatusCode::OK, description = "Order", body = OrderResponse),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found", body = ErrorResponse),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error", body = ErrorResponse),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<StatusCode, StatusError> {
    let state = depot.state()?;

    let order = match parse_order_id(&id.into_inner()) {
        Ok(uuid) => state.app.orders.get_order(uuid).await,
        Err(error) => return Ok(error.render(res)),
    };

    let status = match order {
        Ok(order) => {
            res.render(Json(OrderResponse::from(order)));

            StatusCode::OK
        }
        Err(error) => into_api_error(error, "Failed to retrieve order").render(res),
    };

    Ok(status)
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use orders_app::domain::orders::{MockOrdersService, OrdersServiceError, models::OrderUuid};

    use crate::test_helpers::{make_order, orders_service};

    use super::*;

    fn make_service(orders: MockOrdersService) -> TestResult<Service> {
        orders_service(orders, Router::with_path("orders/{id}").get(handler))
    }

    #[tokio::test]
    async fn test_get_order_success() -> TestResult {
        let uuid = OrderUuid::new();
        let order = make_order(uuid);

        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .withf(move |requested| *requested == uuid)
            .return_once(move |_| Ok(order));

        let mut res = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&make_service(orders)?)
            .await;

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body, OrderResponse::from(make_order(uuid)));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_order_missing_returns_404() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .return_once(|_| Err(OrdersServiceError::NotFound));

        let mut res = TestClient::get(format!("http://example.com/orders/{}", OrderUuid::new()))
            .send(&make_service(orders)?)
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
        assert_eq!(body.error, "Order not found");

        Ok(())
    }

    #[tokio::test]
    async fn test_get_order_non_uuid_returns_404() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_get_order().never();

        let res = TestClient::get("http://example.com/orders/not-a-uuid")
            .send(&make_service(orders)?)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
