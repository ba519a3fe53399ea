//! estagios Portal
//!
//! HTTP front for the job posting workflow. Each route maps to one workflow
//! action; GET runs its display path and POST its submit path.

use anyhow::Result;
use estagios_portal::{api, config, state::AppState};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = config::Config::from_env()?;

    // Initialize tracing (prefer RUST_LOG, fallback to ESTAGIOS_LOG_LEVEL)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_level.clone().into()))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Starting estagios portal");
    info!(listen_addr = %config.listen_addr, database = %config.database.path, "Configuration loaded");

    // Open the record store
    let store = match config.database.open() {
        Ok(store) => {
            info!("Posting store opened");
            store
        }
        Err(e) => {
            error!(error = %e, "Failed to open posting store");
            return Err(e.into());
        }
    };

    if config.database.is_in_memory() {
        info!("Using in-memory store; postings will not survive a restart");
    }

    let state = AppState::new(Box::new(store));
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!(addr = %config.listen_addr, "Listening for connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
                return;
            }
            info!("Received shutdown signal");
        })
        .await?;

    info!("Portal shutdown complete");
    Ok(())
}
