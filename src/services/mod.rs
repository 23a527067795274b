//! Services Layer
//!
//! Business logic called by the REST API handlers. Services own the
//! fetch/compute/apply sequence; handlers only translate HTTP.
//!
//! # Architecture
//!
//! ```text
//! REST API --> Services --> MarketDataSource (OpenAlgo)
//!                  |
//!                  └──> trending_oi engine --> AppState
//! ```
//!
//! # Services
//!
//! - `TrendingOiService` - Load and compute the Trending OI table
//! - `LoadTracker` - Last-request-wins load generations

pub mod load_tracker;
pub mod trending_oi_service;

// Re-export commonly used types and services
pub use load_tracker::{LoadToken, LoadTracker};
pub use trending_oi_service::{LoadOutcome, TrendingOiRequest, TrendingOiService, TrendingOiView};
