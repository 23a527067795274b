//! Columnar dataset to per-timestamp basket totals

use super::classifier::Basket;
use super::strikes::StrikeSet;
use super::types::{columns, ColumnarDataset, RawAggregateRow, SymbolKey, SymbolMetaMap};

/// Running cumulative volume carried through the fold
#[derive(Debug, Clone, Copy, Default)]
struct VolumeTotals {
    ce: f64,
    pe: f64,
    fut: f64,
}

/// Aggregate the basket into one row per timestamp.
///
/// Options outside `selected_strikes` are left out of both OI and volume.
/// Per-candle volume is folded into cumulative totals in timestamp order.
pub fn aggregate(
    dataset: &ColumnarDataset,
    metadata: &SymbolMetaMap,
    selected_strikes: Option<&StrikeSet>,
) -> Vec<RawAggregateRow> {
    if dataset.is_empty() {
        return Vec::new();
    }

    let basket = Basket::partition(metadata, |strike| match (selected_strikes, strike) {
        (None, _) => true,
        (Some(set), Some(strike)) => set.contains(strike),
        (Some(_), None) => false,
    });

    let oi_col = dataset.column_index(columns::OI);
    let ltp_col = dataset.column_index(columns::LTP);
    let volume_col = dataset.column_index(columns::VOLUME);

    let future = |column: Option<usize>, index: usize| -> f64 {
        basket
            .future
            .as_ref()
            .map(|key| dataset.value(key, column, index))
            .unwrap_or(0.0)
    };

    dataset
        .timestamps
        .iter()
        .enumerate()
        .scan(VolumeTotals::default(), |totals, (i, timestamp)| {
            totals.ce += sum(dataset, &basket.calls, volume_col, i);
            totals.pe += sum(dataset, &basket.puts, volume_col, i);
            totals.fut += future(volume_col, i);

            Some(RawAggregateRow {
                timestamp: timestamp.clone(),
                ce_oi: sum(dataset, &basket.calls, oi_col, i),
                pe_oi: sum(dataset, &basket.puts, oi_col, i),
                ce_volume: totals.ce,
                pe_volume: totals.pe,
                fut_ltp: future(ltp_col, i),
                fut_oi: future(oi_col, i),
                fut_volume: totals.fut,
            })
        })
        .collect()
}

fn sum(dataset: &ColumnarDataset, keys: &[SymbolKey], column: Option<usize>, index: usize) -> f64 {
    keys.iter().map(|key| dataset.value(key, column, index)).sum()
}
