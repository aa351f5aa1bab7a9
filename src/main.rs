//! Shelf Server - Personal Library Manager
//!
//! A Rust REST API server for a personal book library.

use std::net::SocketAddr;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use shelf_server::{
    api,
    config::{AppConfig, LoggingConfig},
    repository::{self, LoadOutcome},
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize tracing
    let _log_guard = init_tracing(&config.logging);

    tracing::info!("Starting Shelf Server v{}", env!("CARGO_PKG_VERSION"));

    // Open storage
    let (repository, outcome) = repository::open(&config.storage).await?;
    match outcome {
        LoadOutcome::Ready => tracing::info!("Connected to {}", config.storage.database_url),
        LoadOutcome::Loaded { count } => {
            tracing::info!("Loaded {} books from {}", count, config.storage.json_path)
        }
        LoadOutcome::Missing => {
            tracing::info!("No library file at {}, starting empty", config.storage.json_path)
        }
        // The repository has already warned about the unreadable file
        LoadOutcome::Recovered { .. } => tracing::info!("Starting with an empty library"),
    }

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    let services = Services::new(repository, &config.storage);

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = api::create_router(state);

    // Start server
    let addr = SocketAddr::new(server_host.parse()?, server_port);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Install the global subscriber; the returned guard flushes the log file on drop
fn init_tracing(logging: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("shelf_server={},tower_http=debug", logging.level).into());

    let stdout_layer = if logging.format == "json" {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    let (file_layer, guard) = match logging.directory {
        Some(ref directory) => {
            let appender = tracing_appender::rolling::daily(directory, "shelf-server.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    guard
}
