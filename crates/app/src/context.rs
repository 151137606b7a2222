//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, DatabaseConfig},
    domain::{
        inventory::{HttpInventoryClient, InventoryConfig, InventoryError},
        orders::{
            OrdersService, OrdersWorkflow,
            repositories::{InMemoryOrdersRepository, OrdersRepository, PgOrdersRepository},
        },
    },
    telemetry::Telemetry,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrations(#[source] sqlx::migrate::MigrateError),

    #[error("failed to build product service client")]
    Inventory(#[source] InventoryError),
}

#[derive(Clone)]
pub struct AppContext {
    pub orders: Arc<dyn OrdersService>,
}

impl AppContext {
    /// Build application context backed by `PostgreSQL`, applying migrations first.
    ///
    /// # Errors
    ///
    /// Returns an error when connecting, migrating or building the inventory client fails.
    pub async fn from_database(
        database: &DatabaseConfig,
        inventory: InventoryConfig,
        telemetry: Arc<dyn Telemetry>,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(database)
            .await
            .map_err(AppInitError::Database)?;

        database::migrate(&pool)
            .await
            .map_err(AppInitError::Migrations)?;

        Self::with_repository(Arc::new(PgOrdersRepository::new(pool)), inventory, telemetry)
    }

    /// Build application context backed by a process-local store.
    ///
    /// # Errors
    ///
    /// Returns an error when building the inventory client fails.
    pub fn in_memory(
        inventory: InventoryConfig,
        telemetry: Arc<dyn Telemetry>,
    ) -> Result<Self, AppInitError> {
        Self::with_repository(
            Arc::new(InMemoryOrdersRepository::new()),
            inventory,
            telemetry,
        )
    }

    fn with_repository(
        repository: Arc<dyn OrdersRepository>,
        inventory: InventoryConfig,
        telemetry: Arc<dyn Telemetry>,
    ) -> Result<Self, AppInitError> {
        let inventory = HttpInventoryClient::new(inventory, Arc::clone(&telemetry))
            .map_err(AppInitError::Inventory)?;

        Ok(Self {
            orders: Arc::new(OrdersWorkflow::new(
                repository,
                Arc::new(inventory),
                telemetry,
            )),
        })
    }
}
