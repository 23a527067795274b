//! REST API server module
//!
//! Endpoints:
//! - `GET  /health`
//! - `GET  /api/v1/trendingoi/intervals`
//! - `POST /api/v1/trendingoi`
//! - `GET  /api/v1/trendingoi/latest`

pub mod handlers;
mod server;
mod types;

pub use server::{router, ApiServer};
pub use types::{ApiResponse, Empty, IntervalsData};
