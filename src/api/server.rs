//! HTTP server for the Trending OI REST API

use crate::api::handlers;
use crate::error::Result;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Build the router with all routes
pub fn router(state: Arc<AppState>) -> Router {
    // Allow all for local dashboards
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // ================================================================
        // Health check
        // ================================================================
        .route("/health", get(handlers::health_check))
        .route("/", get(handlers::health_check))

        // ================================================================
        // Trending OI
        // ================================================================
        .route("/api/v1/trendingoi", post(handlers::load_trending_oi))
        .route("/api/v1/trendingoi/intervals", get(handlers::get_intervals))
        .route("/api/v1/trendingoi/latest", get(handlers::get_latest))

        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// API server manager
#[derive(Default)]
pub struct ApiServer {
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ApiServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind and serve in a background task; returns the bound address
    pub async fn start(&mut self, state: Arc<AppState>) -> Result<SocketAddr> {
        let addr = state.config.listen_addr();
        let app = router(state);

        let listener = tokio::net::TcpListener::bind(addr.as_str()).await?;
        let local_addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        self.shutdown_tx = Some(shutdown_tx);

        tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("API server shutting down");
            });

            if let Err(e) = server.await {
                error!("API server error: {}", e);
            }
        });

        info!("Trending OI API server started on {}", local_addr);
        info!("  GET  http://{}/health", local_addr);
        info!("  GET  http://{}/api/v1/trendingoi/intervals", local_addr);
        info!("  POST http://{}/api/v1/trendingoi", local_addr);
        info!("  GET  http://{}/api/v1/trendingoi/latest", local_addr);

        Ok(local_addr)
    }

    /// Stop the server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            info!("API server stop signal sent");
        }
    }

    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some()
    }
}

impl Drop for ApiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[tokio::test]
    async fn test_serves_health_on_ephemeral_port() {
        let mut config = AppConfig::default();
        config.upstream.api_key = "test".to_string();
        config.server.port = 0;
        let state = Arc::new(AppState::new(config).unwrap());

        let mut server = ApiServer::new();
        let addr = server.start(state).await.unwrap();
        assert!(server.is_running());

        let body: serde_json::Value = reqwest::get(format!("http://{}/health", addr))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "success");

        let response = reqwest::get(format!("http://{}/api/v1/trendingoi/latest", addr))
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 404);

        server.stop();
        assert!(!server.is_running());
    }
}
