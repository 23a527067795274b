//! Heatmap scaling for the trending table

use super::types::{ColumnKey, ProcessedRow};
use std::collections::BTreeMap;

/// Largest absolute value of a column; 0 means no color scaling
pub fn column_max(rows: &[ProcessedRow], column: ColumnKey) -> f64 {
    rows.iter()
        .map(|row| row.column(column).abs())
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max)
}

/// `column_max` for every column, keyed by column name
pub fn column_max_map(rows: &[ProcessedRow]) -> BTreeMap<String, f64> {
    ColumnKey::all()
        .map(|key| (key.name(), column_max(rows, key)))
        .collect()
}
