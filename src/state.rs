//! Application state management

use crate::config::AppConfig;
use crate::error::Result;
use crate::market::{MarketDataSource, OpenAlgoClient};
use crate::services::load_tracker::{LoadToken, LoadTracker};
use crate::services::TrendingOiView;
use parking_lot::RwLock;
use std::sync::Arc;

/// Application state shared across all API handlers
pub struct AppState {
    pub config: AppConfig,

    /// Contract chain and history provider
    pub source: Arc<dyn MarketDataSource>,

    /// Load generations for stale-response suppression
    loads: LoadTracker,

    /// Most recently applied Trending OI view
    latest_view: RwLock<Option<Arc<TrendingOiView>>>,
}

impl AppState {
    /// Create state backed by the configured OpenAlgo server
    pub fn new(config: AppConfig) -> Result<Self> {
        let source = Arc::new(OpenAlgoClient::new(&config.upstream)?);
        tracing::info!("Upstream OpenAlgo host: {}", config.upstream.host);
        Ok(Self::with_source(config, source))
    }

    pub fn with_source(config: AppConfig, source: Arc<dyn MarketDataSource>) -> Self {
        Self {
            config,
            source,
            loads: LoadTracker::new(),
            latest_view: RwLock::new(None),
        }
    }

    /// Issue a token for a new load; earlier loads become stale
    pub fn begin_load(&self) -> LoadToken {
        self.loads.issue()
    }

    pub fn is_current(&self, token: LoadToken) -> bool {
        self.loads.is_current(token)
    }

    /// Store `view` if `token` is still the latest load.
    ///
    /// The check happens under the write lock so an older load can never
    /// overwrite a newer one.
    pub fn apply_view(&self, token: LoadToken, view: Arc<TrendingOiView>) -> bool {
        let mut latest = self.latest_view.write();
        if !self.loads.is_current(token) {
            return false;
        }
        *latest = Some(view);
        true
    }

    pub fn latest_view(&self) -> Option<Arc<TrendingOiView>> {
        self.latest_view.read().clone()
    }
}
