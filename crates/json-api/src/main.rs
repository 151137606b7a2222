//! Order Service JSON API Server

use std::{process, sync::Arc};

use salvo::{
    affix_state::inject,
    oapi::{OpenApi, swagger_ui::SwaggerUi},
    prelude::*,
    trailing_slash::remove_slash,
};
use tracing::{error, info};

use orders_app::{
    context::{AppContext, AppInitError},
    telemetry::Telemetry,
};

use crate::{
    config::{ServerConfig, db::OrderStoreKind},
    observability::{
        Metrics, Observability, PrometheusTelemetry, RequestSettings, metrics_handler,
        request_logging,
    },
    state::{ServiceInfo, State},
};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod config;
mod extensions;
mod healthcheck;
mod observability;
mod orders;
mod router;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;

/// Order Service JSON API Server entry point
#[tokio::main]
pub async fn main() {
    // Load configuration from .env and CLI arguments
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    let observability = match Observability::init(&config) {
        Ok(observability) => observability,
        Err(init_error) => {
            #[expect(
                clippy::print_stderr,
                reason = "subscriber failed to install, stderr is all that is left"
            )]
            {
                eprintln!("Observability error: {init_error}");
            }

            process::exit(1);
        }
    };

    let metrics = match Metrics::new() {
        Ok(metrics) => Arc::new(metrics),
        Err(metrics_error) => {
            error!("failed to register metrics: {metrics_error}");

            process::exit(1);
        }
    };

    let telemetry: Arc<dyn Telemetry> = Arc::new(PrometheusTelemetry::new(&metrics));

    let app = match build_app_context(&config, telemetry).await {
        Ok(app) => app,
        Err(init_error) => {
            error!("failed to initialize app context: {init_error}");

            process::exit(1);
        }
    };

    let service = ServiceInfo {
        name: config.observability.otel_service_name.clone(),
        version: config.observability.otel_service_version.clone(),
    };

    let state = State::new(app, metrics, RequestSettings::from(&config), service).into_shared();

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(remove_slash())
        .hoop(inject(state))
        .hoop(request_logging)
        .push(Router::with_path("health").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(metrics_handler))
        .push(router::app_router());

    let doc = OpenApi::new("Order Service", env!("CARGO_PKG_VERSION")).merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    // Bind server
    let listener = TcpListener::new(addr).bind().await;

    let server = Server::new(listener);

    let handle = server.handle();

    // Listen for shutdown signal
    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    // Start serving requests
    server.serve(router).await;

    info!("server stopped");

    observability.shutdown();
}

async fn build_app_context(
    config: &ServerConfig,
    telemetry: Arc<dyn Telemetry>,
) -> Result<AppContext, AppInitError> {
    let inventory = config.inventory.client_config();

    match config.database.order_store {
        OrderStoreKind::Postgres => {
            AppContext::from_database(&config.database.pool_config(), inventory, telemetry).await
        }
        OrderStoreKind::Memory => {
            info!("using in-memory order store, orders are lost on restart");

            AppContext::in_memory(inventory, telemetry)
        }
    }
}
