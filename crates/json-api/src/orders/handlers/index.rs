//! Order Index Handler

use salvo::{oapi::extract::QueryParam, prelude::*};

use orders_app::domain::orders::data::{OrderFilter, Pagination};

use crate::{
    extensions::*,
    orders::{ErrorResponse, OrdersResponse, into_api_error},
};

/// Order Index Handler
///
/// Returns a page of orders, most recent first.
#[endpoint(
    tags("orders"),
    summary = "List Orders",
    responses(
        (status_code = StatusCode::OK, description = "Orders", body = OrdersResponse),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid filter or pagination", body = ErrorResponse),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error", body = ErrorResponse),
    ),
)]
pub(crate) async fn handler(
    user_id: QueryParam<String, false>,
    status: QueryParam<String, false>,
    limit: QueryParam<String, false>,
    offset: QueryParam<String, false>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<StatusCode, StatusError> {
    let state = depot.state()?;

    let (user_id, status) = (user_id.into_inner(), status.into_inner());
    let (limit, offset) = (limit.into_inner(), offset.into_inner());

    let query = OrderFilter::parse(user_id.as_deref(), status.as_deref()).and_then(|filter| {
        Pagination::parse(limit.as_deref(), offset.as_deref())
            .map(|pagination| (filter, pagination))
    });

    let result = match query {
        Ok((filter, pagination)) => state.app.orders.list_orders(filter, pagination).await,
        Err(error) => Err(error),
    };

    let status = match result {
        Ok(page) => {
            res.render(Json(OrdersResponse::from(page)));

            StatusCode::OK
        }
        Err(error) => into_api_error(error, "Failed to retrieve orders").render(res),
    };

    Ok(status)
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use orders_app::domain::orders::{
        MockOrdersService, OrdersServiceError,
        data::OrderPage,
        models::OrderUuid,
        status::OrderStatus,
    };

    use crate::test_helpers::{make_order, orders_service};

    use super::*;

    fn make_service(orders: MockOrdersService) -> TestResult<Service> {
        orders_service(orders, Router::with_path("orders").get(handler))
    }

    #[tokio::test]
    async fn test_index_applies_defaults() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_list_orders()
            .once()
            .withf(|filter, pagination| {
                *filter == OrderFilter::default() && *pagination == Pagination::default()
            })
            .return_once(|_, pagination| {
                Ok(OrderPage {
                    orders: vec![],
                    pagination,
                })
            });

        let mut res = TestClient::get("http://example.com/orders")
            .send(&make_service(orders)?)
            .await;

        let body: OrdersResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.orders.is_empty());
        assert_eq!((body.total, body.limit, body.offset), (0, 10, 0));

        Ok(())
    }

    #[tokio::test]
    async fn test_index_forwards_filters_and_window() -> TestResult {
        let first = OrderUuid::new();
        let second = OrderUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_list_orders()
            .once()
            .withf(|filter, pagination| {
                filter.user_id.as_deref() == Some("u1")
                    && filter.status == Some(OrderStatus::Pending)
                    && *pagination == Pagination { limit: 2, offset: 4 }
            })
            .return_once(move |_, pagination| {
                Ok(OrderPage {
                    orders: vec![make_order(first), make_order(second)],
                    pagination,
                })
            });

        let mut res =
            TestClient::get("http://example.com/orders?user_id=u1&status=pending&limit=2&offset=4")
                .send(&make_service(orders)?)
                .await;

        let body: OrdersResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.total, 2, "total counts the returned page");
        assert_eq!(body.orders[0].id, first.into_uuid());
        assert_eq!(body.orders[1].id, second.into_uuid());
        assert_eq!((body.limit, body.offset), (2, 4));

        Ok(())
    }

    #[tokio::test]
    async fn test_index_blank_filters_are_ignored() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_list_orders()
            .once()
            .withf(|filter, _| *filter == OrderFilter::default())
            .return_once(|_, pagination| {
                Ok(OrderPage {
                    orders: vec![],
                    pagination,
                })
            });

        let res = TestClient::get("http://example.com/orders?user_id=&status=")
            .send(&make_service(orders)?)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_index_invalid_pagination_returns_400() -> TestResult {
        for query in ["limit=abc", "limit=-1", "offset=1.5"] {
            let mut orders = MockOrdersService::new();

            orders.expect_list_orders().never();

            let mut res = TestClient::get(format!("http://example.com/orders?{query}"))
                .send(&make_service(orders)?)
                .await;

            let body: ErrorResponse = res.take_json().await?;

            assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST), "{query}");
            assert!(body.error.starts_with("Invalid "), "{query}");
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_index_unknown_status_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_list_orders().never();

        let res = TestClient::get("http://example.com/orders?status=shipped")
            .send(&make_service(orders)?)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_index_storage_failure_returns_500() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_list_orders()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::DuplicateId));

        let mut res = TestClient::get("http://example.com/orders")
            .send(&make_service(orders)?)
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(body.error, "Failed to retrieve orders");

        Ok(())
    }
}
