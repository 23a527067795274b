//! Trending OI Service
//!
//! Loads one trading day of per-minute basket data and turns it into the
//! Trending OI table. Called by the REST API.

use crate::error::{AppError, Result};
use crate::market::types::{ChainRequest, ContractChain, HistoryRequest};
use crate::services::load_tracker::LoadToken;
use crate::state::AppState;
use crate::trending_oi::{self, interval::SOURCE_INTERVAL, OiInterval, StrikeSelection, TrendingOiTable};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Parameters of one Trending OI load
#[derive(Debug, Clone, Deserialize)]
pub struct TrendingOiRequest {
    pub underlying: String,
    pub exchange: String,
    pub expiry_date: String,
    /// Trading date, YYYY-MM-DD
    pub date: String,
    #[serde(default)]
    pub interval: Option<OiInterval>,
    #[serde(default)]
    pub strikes: Option<StrikeSelection>,
}

/// Computed table plus the context it was computed for
#[derive(Debug, Clone, Serialize)]
pub struct TrendingOiView {
    pub generation: u64,
    pub underlying: String,
    pub exchange: String,
    pub expiry: String,
    pub date: String,
    pub interval: OiInterval,
    pub atm_strike: f64,
    pub lot_size: i64,
    /// Strikes included in the sums; `None` when every strike is used
    pub strikes: Option<Vec<f64>>,
    #[serde(flatten)]
    pub table: TrendingOiTable,
}

/// Result of a load that did not fail
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    Applied(Arc<TrendingOiView>),
    /// A newer load was issued while this one was in flight
    Superseded,
}

/// Trending OI service for business logic
pub struct TrendingOiService;

impl TrendingOiService {
    /// Run one load under `token`.
    ///
    /// Results and failures of a superseded load are dropped silently.
    pub async fn load(state: &AppState, request: TrendingOiRequest, token: LoadToken) -> Result<LoadOutcome> {
        info!(
            "TrendingOiService::load #{} - {} {} {} on {}",
            token.generation(),
            request.underlying,
            request.exchange,
            request.expiry_date,
            request.date
        );

        match Self::fetch_and_compute(state, &request, token).await {
            Ok(Some(view)) => {
                let view = Arc::new(view);
                if state.apply_view(token, view.clone()) {
                    info!("Applied Trending OI load #{} ({} rows)", token.generation(), view.table.rows.len());
                    Ok(LoadOutcome::Applied(view))
                } else {
                    debug!("Discarding superseded load #{}", token.generation());
                    Ok(LoadOutcome::Superseded)
                }
            }
            Ok(None) => {
                debug!("Discarding superseded load #{}", token.generation());
                Ok(LoadOutcome::Superseded)
            }
            Err(e) if !state.is_current(token) => {
                debug!("Ignoring failure of superseded load #{}: {}", token.generation(), e);
                Ok(LoadOutcome::Superseded)
            }
            Err(e) => {
                error!("Trending OI load #{} failed: {}", token.generation(), e);
                Err(e)
            }
        }
    }

    /// Supported display interval labels
    pub fn intervals() -> Vec<&'static str> {
        OiInterval::ALL.iter().map(|i| i.label()).collect()
    }

    // ========================================================================
    // Private Helper Methods
    // ========================================================================

    /// `Ok(None)` when the load went stale before its result was ready
    async fn fetch_and_compute(
        state: &AppState,
        request: &TrendingOiRequest,
        token: LoadToken,
    ) -> Result<Option<TrendingOiView>> {
        Self::validate(request)?;

        let interval = match request.interval {
            Some(interval) => interval,
            None => state.config.defaults.interval()?,
        };
        let selection = request.strikes.clone().unwrap_or(StrikeSelection::Auto {
            strikes_each_side: state.config.defaults.strikes_each_side,
        });

        let chain = state
            .source
            .fetch_contract_chain(&ChainRequest {
                underlying: request.underlying.clone(),
                exchange: request.exchange.clone(),
                expiry_date: request.expiry_date.clone(),
            })
            .await?;

        if !state.is_current(token) {
            return Ok(None);
        }

        let symbols = chain.history_symbols();
        debug!("Fetching {} history for {} symbols from {}", SOURCE_INTERVAL, symbols.len(), state.source.id());
        let history = state
            .source
            .fetch_history(&HistoryRequest::single_day(&symbols, SOURCE_INTERVAL, &request.date))
            .await?;

        if !state.is_current(token) {
            return Ok(None);
        }

        Ok(Some(Self::build_view(request, &chain, history.into_dataset(), selection, interval, token)))
    }

    fn build_view(
        request: &TrendingOiRequest,
        chain: &ContractChain,
        dataset: trending_oi::ColumnarDataset,
        selection: StrikeSelection,
        interval: OiInterval,
        token: LoadToken,
    ) -> TrendingOiView {
        let metadata = chain.symbol_meta();
        let selected = selection.resolve(&chain.option_strikes(), chain.atm_strike);
        let table = trending_oi::compute(&dataset, &metadata, selected.as_ref(), interval);

        TrendingOiView {
            generation: token.generation(),
            underlying: chain.underlying.clone(),
            exchange: chain.exchange.clone(),
            expiry: chain.expiry.clone(),
            date: request.date.clone(),
            interval,
            atm_strike: chain.atm_strike,
            lot_size: chain.lot_size,
            strikes: selected.map(|set| set.strikes().to_vec()),
            table,
        }
    }

    fn validate(request: &TrendingOiRequest) -> Result<()> {
        if request.underlying.trim().is_empty() {
            return Err(AppError::Validation("Underlying is required".to_string()));
        }
        if request.exchange.trim().is_empty() {
            return Err(AppError::Validation("Exchange is required".to_string()));
        }
        if request.expiry_date.trim().is_empty() {
            return Err(AppError::Validation("Expiry date is required".to_string()));
        }
        NaiveDate::parse_from_str(&request.date, "%Y-%m-%d")
            .map_err(|_| AppError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", request.date)))?;
        Ok(())
    }
}
