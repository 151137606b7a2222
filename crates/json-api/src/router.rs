//! App Router

use salvo::Router;

use crate::orders;

pub(crate) fn app_router() -> Router {
    Router::with_path("orders")
        .get(orders::index::handler)
        .post(orders::create::handler)
        .push(
            Router::with_path("{id}")
                .get(orders::get::handler)
                .push(Router::with_path("status").put(orders::update_status::handler)),
        )
}
