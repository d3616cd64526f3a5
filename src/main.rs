//! IPS Progresando maintenance server
//!
//! REST backend computing equipment maintenance status for the front end.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use progresando_server::{
    api,
    config::AppConfig,
    gateway::{HttpGateway, MaintenanceGateway},
    services::{alerts::AlertMonitor, Services},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("progresando_server={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Progresando Server v{}", env!("CARGO_PKG_VERSION"));

    // Remote inventory API
    let gateway: Arc<dyn MaintenanceGateway> = Arc::new(HttpGateway::new(&config.gateway)?);
    tracing::info!("Using remote API at {}", config.gateway.base_url);

    let services = Services::new(gateway, &config.maintenance, config.email.clone());

    // Background overdue check
    if config.maintenance.alerts_enabled {
        AlertMonitor::new(
            services.maintenance.clone(),
            services.email.clone(),
            Duration::from_secs(config.maintenance.alert_check_interval_secs.max(1)),
        )
        .spawn();
    } else {
        tracing::info!("Maintenance alerts disabled");
    }

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = api::create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
