use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skyward_core::booking::{BookingConfig, BookingOrchestrator};
use skyward_core::clients::{
    build_client, HttpFlightDirectory, HttpPrivilegeLedger, HttpTicketLedger,
};
use skyward_core::flight::SqliteFlightStore;
use skyward_core::privilege::SqlitePrivilegeStore;
use skyward_core::ticket::SqliteTicketStore;
use skyward_core::{load_config, validate_config, Config, ServiceRole};

use skyward_server::api::{
    create_bonus_router, create_flight_router, create_gateway_router, create_ticket_router,
};
use skyward_server::state::{
    BonusServiceState, FlightServiceState, GatewayState, TicketServiceState,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("SKYWARD_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    let role = config.service.role;
    info!(version = VERSION, role = role.as_str(), "Configuration loaded successfully");

    let app = build_router(&config)?;

    // Start server
    let addr = config.listen_addr();
    info!("Starting {} service on {}", role.as_str(), addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");

    Ok(())
}

/// Build the router for the configured service role.
fn build_router(config: &Config) -> Result<Router> {
    let db_path = &config.database.path;

    let router = match config.service.role {
        ServiceRole::Gateway => {
            let gateway = &config.gateway;
            let client = build_client(Duration::from_secs(gateway.timeout_secs))
                .context("Failed to build HTTP client")?;

            info!(
                flight = %gateway.flight_url,
                ticket = %gateway.ticket_url,
                bonus = %gateway.bonus_url,
                timeout_secs = gateway.timeout_secs,
                policy = ?gateway.loyalty_failure_policy,
                serialize_purchases = gateway.serialize_purchases,
                "Downstream services configured"
            );

            let orchestrator = BookingOrchestrator::new(
                Arc::new(HttpFlightDirectory::new(client.clone(), &gateway.flight_url)),
                Arc::new(HttpTicketLedger::new(client.clone(), &gateway.ticket_url)),
                Arc::new(HttpPrivilegeLedger::new(client, &gateway.bonus_url)),
                BookingConfig::from(gateway),
            );
            create_gateway_router(Arc::new(GatewayState::new(orchestrator)))
        }
        ServiceRole::Flight => {
            let store = SqliteFlightStore::new(db_path)
                .context("Failed to create flight store")?;
            info!("Flight store initialized at {:?}", db_path);
            create_flight_router(Arc::new(FlightServiceState::new(Arc::new(store))))
        }
        ServiceRole::Ticket => {
            let store = SqliteTicketStore::new(db_path)
                .context("Failed to create ticket store")?;
            info!("Ticket store initialized at {:?}", db_path);
            create_ticket_router(Arc::new(TicketServiceState::new(Arc::new(store))))
        }
        ServiceRole::Bonus => {
            let store = SqlitePrivilegeStore::new(db_path)
                .context("Failed to create privilege store")?;
            info!("Privilege store initialized at {:?}", db_path);
            create_bonus_router(Arc::new(BonusServiceState::new(Arc::new(store))))
        }
    };

    Ok(router)
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
