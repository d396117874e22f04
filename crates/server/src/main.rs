use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_core::{
    load_config, validate_config, BookingService, EventCatalog, HttpBookingClient,
    HttpEventCatalog, KeyValueStore, MemoryStore, SqliteStore, StorageBackend,
};
use storefront_server::api::create_router;
use storefront_server::state::AppState;

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
    let config_path = std::env::var("STOREFRONT_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("storefront.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Event service: {}", config.events.url);
    info!("Booking service: {}", config.bookings.url);

    // Cart and session storage
    let store: Arc<dyn KeyValueStore> = match config.storage.backend {
        StorageBackend::Sqlite => {
            info!("Storage: sqlite at {:?}", config.storage.path);
            Arc::new(
                SqliteStore::new(&config.storage.path).context("Failed to open storage database")?,
            )
        }
        StorageBackend::Memory => {
            warn!("Storage: in-memory, cart and session are lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    // Remote services
    let catalog: Arc<dyn EventCatalog> = Arc::new(
        HttpEventCatalog::new(&config.events).context("Failed to create event service client")?,
    );
    let bookings: Arc<dyn BookingService> = Arc::new(
        HttpBookingClient::new(&config.bookings)
            .context("Failed to create booking service client")?,
    );

    let addr = SocketAddr::new(config.server.host, config.server.port);

    // Create app state
    let state = Arc::new(AppState::new(config, store, catalog, bookings));
    {
        let cart = state.cart().read().await;
        info!(
            "Cart restored: {} line(s), {} ticket(s)",
            cart.items().len(),
            cart.get_item_count()
        );
    }

    // Create router
    let app = create_router(state);

    // Start server
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
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

    info!("Shutdown signal received");
}
