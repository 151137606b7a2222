//! Server configuration module

use clap::Parser;

use crate::config::{
    db::DatabaseConfig,
    inventory::InventoryServiceConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    server::ServerRuntimeConfig,
};

pub(crate) mod db;
pub(crate) mod inventory;
pub(crate) mod observability;
pub(crate) mod server;

/// Order Service configuration
#[derive(Debug, Parser)]
#[command(name = "orders-json", about = "Order Service JSON API", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Observability (traces/metrics) settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Order store settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Product service settings.
    #[command(flatten)]
    pub inventory: InventoryServiceConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}
