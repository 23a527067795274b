//! Trending OI derivation engine
//!
//! Turns per-minute, per-contract snapshots of an option basket and its
//! future into the rows of the Trending OI table.
//!
//! ```text
//! classify -> aggregate -> resample -> derive_changes -> { column_max, sentiment }
//! ```
//!
//! Every pass is a pure function of the dataset, the contract metadata, the
//! strike selection and the interval. Nothing is carried between passes.

pub mod aggregator;
pub mod changes;
pub mod classifier;
pub mod heatmap;
pub mod interval;
pub mod resampler;
pub mod sentiment;
pub mod strikes;
pub mod types;

pub use aggregator::aggregate;
pub use changes::derive_changes;
pub use heatmap::{column_max, column_max_map};
pub use interval::OiInterval;
pub use resampler::resample;
pub use sentiment::Sentiment;
pub use strikes::{StrikeSelection, StrikeSet};
pub use types::{
    ColumnKey, ColumnKind, ColumnarDataset, ContractType, Metric, MetricSet, ProcessedRow,
    RawAggregateRow, SymbolKey, SymbolMeta, SymbolMetaMap, Timestamp,
};

use serde::Serialize;
use std::collections::BTreeMap;

/// Processed row with its sentiment labels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendingOiRow {
    #[serde(flatten)]
    pub row: ProcessedRow,
    /// From the interval changes of the future
    pub sentiment: Sentiment,
    /// From the day changes of the future
    pub day_sentiment: Sentiment,
}

/// Output of one computation pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendingOiTable {
    pub rows: Vec<TrendingOiRow>,
    pub column_max: BTreeMap<String, f64>,
}

/// Run the full pipeline
pub fn compute(
    dataset: &ColumnarDataset,
    metadata: &SymbolMetaMap,
    selected_strikes: Option<&StrikeSet>,
    interval: OiInterval,
) -> TrendingOiTable {
    let raw = aggregate(dataset, metadata, selected_strikes);
    let Some(first_raw) = raw.first() else {
        return TrendingOiTable::default();
    };

    let resampled = resample(&raw, interval.minutes());
    let processed = derive_changes(&resampled, first_raw);
    let column_max = column_max_map(&processed);

    let rows = processed
        .into_iter()
        .map(|row| TrendingOiRow {
            sentiment: sentiment::classify(row.change.fut_ltp, row.change.fut_oi),
            day_sentiment: sentiment::classify(row.day_change.fut_ltp, row.day_change.fut_oi),
            row,
        })
        .collect();

    TrendingOiTable { rows, column_max }
}
