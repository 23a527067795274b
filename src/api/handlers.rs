//! REST API endpoint handlers

use crate::api::types::{ApiResponse, Empty, IntervalsData};
use crate::error::AppError;
use crate::services::{LoadOutcome, TrendingOiRequest, TrendingOiService, TrendingOiView};
use crate::state::AppState;
use axum::{
    extract::{Json, State as AxumState},
    http::StatusCode,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

type ApiResult<T> = (StatusCode, Json<ApiResponse<T>>);

fn error_response<T: Serialize>(err: &AppError) -> ApiResult<T> {
    (err.status_code(), Json(ApiResponse::error(&err.to_string())))
}

// ============================================================================
// Health Check
// ============================================================================

/// Health check endpoint - GET /health or GET /
pub async fn health_check() -> ApiResult<Empty> {
    (
        StatusCode::OK,
        Json(ApiResponse::success_with_message("Trending OI API is running")),
    )
}

// ============================================================================
// Trending OI
// ============================================================================

/// Supported display intervals - GET /api/v1/trendingoi/intervals
pub async fn get_intervals() -> ApiResult<IntervalsData> {
    (
        StatusCode::OK,
        Json(ApiResponse::success_with_data(IntervalsData::new(TrendingOiService::intervals()))),
    )
}

/// Load and compute a Trending OI table - POST /api/v1/trendingoi
///
/// Every request supersedes those still in flight. A superseded request
/// answers with a message and no data.
pub async fn load_trending_oi(
    AxumState(state): AxumState<Arc<AppState>>,
    Json(request): Json<TrendingOiRequest>,
) -> ApiResult<Arc<TrendingOiView>> {
    let token = state.begin_load();
    info!(
        "Trending OI request #{} for {} {}",
        token.generation(),
        request.underlying,
        request.expiry_date
    );

    match TrendingOiService::load(&state, request, token).await {
        Ok(LoadOutcome::Applied(view)) => (StatusCode::OK, Json(ApiResponse::success_with_data(view))),
        Ok(LoadOutcome::Superseded) => (
            StatusCode::OK,
            Json(ApiResponse::success_with_message("Superseded by a newer request")),
        ),
        Err(e) => error_response(&e),
    }
}

/// Most recently applied table - GET /api/v1/trendingoi/latest
pub async fn get_latest(AxumState(state): AxumState<Arc<AppState>>) -> ApiResult<Arc<TrendingOiView>> {
    match state.latest_view() {
        Some(view) => (StatusCode::OK, Json(ApiResponse::success_with_data(view))),
        None => error_response(&AppError::NotFound("No Trending OI data loaded yet".to_string())),
    }
}
