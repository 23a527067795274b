//! REST API types
//!
//! Responses follow the OpenAlgo envelope: `status` is `"success"` or
//! `"error"`, with an optional `message` and `data`.

use crate::trending_oi::interval::SOURCE_INTERVAL;
use serde::Serialize;

/// Standard API response envelope
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success_with_message(message: &str) -> Self {
        Self {
            status: "success".to_string(),
            message: Some(message.to_string()),
            data: None,
        }
    }

    pub fn success_with_data(data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: None,
            data: Some(data),
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.to_string()),
            data: None,
        }
    }
}

/// Empty data type for responses without data
#[derive(Debug, Clone, Serialize)]
pub struct Empty {}

/// GET /api/v1/trendingoi/intervals
#[derive(Debug, Clone, Serialize)]
pub struct IntervalsData {
    pub intervals: Vec<&'static str>,
    /// Interval the history is requested at before resampling
    pub source_interval: &'static str,
}

impl IntervalsData {
    pub fn new(intervals: Vec<&'static str>) -> Self {
        Self {
            intervals,
            source_interval: SOURCE_INTERVAL,
        }
    }
}
