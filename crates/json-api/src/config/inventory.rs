//! Product Service Config

use std::time::Duration;

use clap::Args;
use orders_app::domain::inventory::InventoryConfig;

/// Product service settings.
#[derive(Debug, Args)]
pub struct InventoryServiceConfig {
    /// Base URL of the product service.
    #[arg(long, env = "PRODUCT_SERVICE_URL", default_value = "http://localhost:5000")]
    pub product_service_url: String,

    /// Timeout for a single product lookup.
    #[arg(long, env = "PRODUCT_SERVICE_TIMEOUT_MS", default_value_t = 5_000_u64)]
    pub product_service_timeout_ms: u64,
}

impl InventoryServiceConfig {
    /// Client settings for the app crate.
    #[must_use]
    pub fn client_config(&self) -> InventoryConfig {
        InventoryConfig {
            base_url: self.product_service_url.clone(),
            timeout: Duration::from_millis(self.product_service_timeout_ms),
        }
    }
}
