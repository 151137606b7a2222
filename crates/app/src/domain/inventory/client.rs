use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
    time::Duration,
};

use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, StatusCode};
use tracing::{Span, field};

use crate::{
    domain::{
        inventory::{
            errors::InventoryError,
            models::{ProductPayload, ProductSnapshot},
        },
        orders::models::ProductId,
    },
    telemetry::Telemetry,
};

/// Where the product service lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    /// Base URL, e.g. `"http://localhost:5000"`.
    pub base_url: String,

    /// Whole-request timeout for a product lookup.
    pub timeout: Duration,
}

#[automock]
#[async_trait]
pub trait InventoryClient: Send + Sync {
    /// Read the current price and stock of `product`.
    async fn fetch_product(&self, product: ProductId) -> Result<ProductSnapshot, InventoryError>;
}

/// [`InventoryClient`] backed by the product service's HTTP API.
///
/// Each lookup carries the propagation headers of its own client span, so the
/// product service's server span nests under it.
#[derive(Clone)]
pub struct HttpInventoryClient {
    base_url: String,
    http: Client,
    telemetry: Arc<dyn Telemetry>,
}

impl HttpInventoryClient {
    /// Build a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        config: InventoryConfig,
        telemetry: Arc<dyn Telemetry>,
    ) -> Result<Self, InventoryError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            http,
            telemetry,
        })
    }
}

impl Debug for HttpInventoryClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("HttpInventoryClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl InventoryClient for HttpInventoryClient {
    #[tracing::instrument(
        name = "inventory.fetch_product",
        skip_all,
        fields(
            product.id = product.get(),
            http.status_code = field::Empty,
            product.name = field::Empty,
            product.price = field::Empty,
            product.stock = field::Empty,
        ),
        err
    )]
    async fn fetch_product(&self, product: ProductId) -> Result<ProductSnapshot, InventoryError> {
        let url = format!("{}/products/{product}", self.base_url);
        let span = Span::current();

        let mut request = self.http.get(&url);

        for (name, value) in self.telemetry.trace_context(&span).iter() {
            request = request.header(name, value);
        }

        let response = request.send().await?;
        let status = response.status();

        span.record("http.status_code", status.as_u16());

        if status == StatusCode::NOT_FOUND {
            return Err(InventoryError::ProductNotFound(product));
        }

        if !status.is_success() {
            return Err(InventoryError::Status(status.as_u16()));
        }

        let payload: ProductPayload = response.json().await?;
        let snapshot = payload.into_snapshot(product)?;

        span.record("product.name", snapshot.name.as_str());
        span.record("product.price", field::display(snapshot.unit_price));
        span.record("product.stock", snapshot.available_stock);

        Ok(snapshot)
    }
}
