//! Upstream market data sources
//!
//! The contract chain lookup and the columnar history fetch are owned by an
//! external OpenAlgo server; this module only speaks to it.

pub mod openalgo;
pub mod types;

use crate::error::Result;
use async_trait::async_trait;
use types::{ChainRequest, ColumnarHistory, ContractChain, HistoryRequest};

pub use openalgo::OpenAlgoClient;

/// Source of contract metadata and per-minute history
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Source ID used in logs
    fn id(&self) -> &'static str;

    /// Contract chain for one underlying and expiry
    async fn fetch_contract_chain(&self, request: &ChainRequest) -> Result<ContractChain>;

    /// Columnar history for a set of symbols
    async fn fetch_history(&self, request: &HistoryRequest) -> Result<ColumnarHistory>;
}
