//! Wire types for the contract chain and history endpoints

use crate::trending_oi::{
    ColumnarDataset, ContractType, SymbolKey, SymbolMeta, SymbolMetaMap, Timestamp,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parameters identifying one option basket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainRequest {
    pub underlying: String,
    pub exchange: String,
    pub expiry_date: String,
}

/// One contract in the chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainContract {
    pub symbol: String,
    pub exchange: String,
    #[serde(rename = "type")]
    pub contract_type: ContractType,
    #[serde(default)]
    pub strike: Option<f64>,
}

impl ChainContract {
    pub fn key(&self) -> SymbolKey {
        SymbolKey::new(&self.exchange, &self.symbol)
    }
}

/// The future's identity within the chain response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FutureContract {
    pub symbol: String,
    pub exchange: String,
}

/// Contract chain annotated with type and strike
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractChain {
    pub underlying: String,
    pub exchange: String,
    pub expiry: String,
    pub atm_strike: f64,
    pub lot_size: i64,
    #[serde(default)]
    pub future: Option<FutureContract>,
    pub symbols: Vec<ChainContract>,
}

impl ContractChain {
    /// Classification map for the basket, including the future
    pub fn symbol_meta(&self) -> SymbolMetaMap {
        let mut map: SymbolMetaMap = self
            .symbols
            .iter()
            .map(|c| {
                (
                    c.key(),
                    SymbolMeta {
                        contract_type: c.contract_type,
                        strike: c.strike,
                    },
                )
            })
            .collect();

        if let Some(future) = &self.future {
            map.entry(SymbolKey::new(&future.exchange, &future.symbol))
                .or_insert(SymbolMeta {
                    contract_type: ContractType::Future,
                    strike: None,
                });
        }

        map
    }

    /// Distinct option strikes, unsorted
    pub fn option_strikes(&self) -> Vec<f64> {
        self.symbols
            .iter()
            .filter(|c| c.contract_type != ContractType::Future)
            .filter_map(|c| c.strike)
            .collect()
    }

    /// Every symbol whose history is needed for the basket
    pub fn history_symbols(&self) -> Vec<SymbolKey> {
        self.symbol_meta().into_keys().collect()
    }
}

/// Symbol reference in a history request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySymbol {
    pub symbol: String,
    pub exchange: String,
}

impl From<&SymbolKey> for HistorySymbol {
    fn from(key: &SymbolKey) -> Self {
        Self {
            symbol: key.symbol.clone(),
            exchange: key.exchange.clone(),
        }
    }
}

/// Single-day, multi-symbol history request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRequest {
    pub symbols: Vec<HistorySymbol>,
    pub interval: String,
    pub start_date: String,
    pub end_date: String,
}

impl HistoryRequest {
    pub fn single_day(symbols: &[SymbolKey], interval: &str, date: &str) -> Self {
        Self {
            symbols: symbols.iter().map(HistorySymbol::from).collect(),
            interval: interval.to_string(),
            start_date: date.to_string(),
            end_date: date.to_string(),
        }
    }
}

/// Columnar history payload; `symbol_data` is `[column][time]` per symbol
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColumnarHistory {
    #[serde(default)]
    pub timestamps: Vec<Timestamp>,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub symbol_data: HashMap<String, Vec<Vec<Option<f64>>>>,
}

impl ColumnarHistory {
    /// Convert to the engine's dataset. Nulls become zero and keys that are
    /// not `EXCHANGE:SYMBOL` are dropped.
    pub fn into_dataset(self) -> ColumnarDataset {
        let symbol_data = self
            .symbol_data
            .into_iter()
            .filter_map(|(raw_key, series)| match raw_key.parse::<SymbolKey>() {
                Ok(key) => {
                    let series = series
                        .into_iter()
                        .map(|column| column.into_iter().map(|v| v.unwrap_or(0.0)).collect())
                        .collect();
                    Some((key, series))
                }
                Err(e) => {
                    tracing::warn!("Skipping history series: {}", e);
                    None
                }
            })
            .collect();

        ColumnarDataset {
            timestamps: self.timestamps,
            columns: self.columns,
            symbol_data,
        }
    }
}
