use std::env;
use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use bp_tracker_api::api::{create_application, AppState};
use bp_tracker_api::config::ServerConfig;
use bp_tracker_data::database::{Database, DatabaseConfig, DATABASE_NAME};
use bp_tracker_domain::notifications::LogNotifier;

/// Entry point for the BP Tracker API server
///
/// Loads `.env`, installs tracing, opens and migrates the database under the
/// data directory, then serves until Ctrl+C or SIGTERM.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if dotenv().is_err() {
        eprintln!("Warning: .env file not found or couldn't be read. Using environment variables.");
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_span_events(FmtSpan::CLOSE)
                .with_target(false)
                .with_ansi(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stdout),
        )
        .with(env_filter)
        .init();

    info!("Starting BP Tracker API server");

    let config = ServerConfig::from_env().context("Invalid server configuration")?;

    if !config.data_dir.exists() {
        info!("Creating data directory: {}", config.data_dir.display());
        std::fs::create_dir_all(&config.data_dir)
            .with_context(|| format!("Failed to create data directory {}", config.data_dir.display()))?;
    }

    let mut db_config = DatabaseConfig::from_env().context("Invalid database configuration")?;
    if env::var("DB_SQLITE_PATH").is_err() {
        let path = config.data_dir.join(DATABASE_NAME);
        db_config.sqlite_path = Some(path.to_string_lossy().into_owned());
    }

    let db = Database::open(&db_config).context("Failed to open the database")?;
    info!("Using {}", db.describe());

    // Notifications are delivered by the UI shell; the server only logs them
    let notifier = Arc::new(LogNotifier::new());
    let state = AppState::new(db, notifier, &config.data_dir);

    let app = create_application(state);

    let addr = config.socket_addr();
    if !addr.ip().is_loopback() {
        warn!("Listening on non-loopback address {}", addr);
    }
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
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

    info!("Shutting down server...");
}
