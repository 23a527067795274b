//! OpenAlgo Trending OI
//!
//! Derives the Trending OI table (aggregate open interest, volume, PCR and
//! future price for an option basket, with day and interval changes) from
//! OpenAlgo history and serves it over a REST API.

pub mod api;
pub mod config;
pub mod error;
pub mod market;
pub mod services;
pub mod state;
pub mod trending_oi;

use api::ApiServer;
use config::AppConfig;
use state::AppState;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize and run the Trending OI service until Ctrl-C
pub async fn run() -> anyhow::Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "openalgo_trending_oi=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting OpenAlgo Trending OI...");

    let config = AppConfig::load()?;
    let state = Arc::new(AppState::new(config)?);
    tracing::info!("Application state initialized");

    let mut server = ApiServer::new();
    server.start(state).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown requested");
    server.stop();

    Ok(())
}
