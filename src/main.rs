//! Application entry point and server initialization
//!
//! Loads configuration, opens the configured store, and serves the API with
//! graceful shutdown support.

use std::error::Error;

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use linkreg::config::Settings;
use linkreg::handler::AppState;
use linkreg::registry::LinkRegistry;
use linkreg::route::create_app;
use linkreg::store::open_store;

/// Application entry point
///
/// # Environment Variables
///
/// - `PORT` - Server port number (default: 8080)
/// - `DATABASE_URL` - Path to database file (default: "data.db")
/// - `STORAGE_BACKEND` - `redb` or `memory` (default: redb)
/// - `CODE_LENGTH` - Length of generated codes, 6-8 (default: 6)
/// - `MAX_GENERATE_ATTEMPTS` - Retry bound for code generation (default: 16)
/// - `RUST_LOG` - Log filter (default: "linkreg=debug,tower_http=debug")
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file if it exists
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("linkreg=debug,tower_http=debug")),
        )
        .init();

    let settings = Settings::from_env()?;
    let store = open_store(&settings)?;
    let registry = LinkRegistry::from_settings(store, &settings)?;
    let app = create_app(AppState::new(registry));

    let addr = format!("0.0.0.0:{}", settings.port);
    let listener = TcpListener::bind(&addr).await?;

    info!(
        port = settings.port,
        storage = ?settings.storage,
        database = %settings.database_url,
        "server running"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolves on SIGINT (Ctrl+C) or, on Unix, SIGTERM
///
/// Open connections are allowed to complete and in-flight store writes commit
/// before the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, stopping server");
}
