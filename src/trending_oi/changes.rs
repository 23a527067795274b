//! Day and interval changes over the resampled series

use super::types::{MetricSet, ProcessedRow, RawAggregateRow};

/// Derive both classes of change for every resampled row.
///
/// `first_raw` must be element 0 of the series before resampling; it is the
/// day-change baseline for every row regardless of interval. Interval change
/// is measured against the previous processed row, and for the first row it
/// equals the day change.
pub fn derive_changes(resampled: &[RawAggregateRow], first_raw: &RawAggregateRow) -> Vec<ProcessedRow> {
    let baseline = MetricSet::from_raw(first_raw);

    resampled
        .iter()
        .scan(baseline, |previous, row| {
            let values = MetricSet::from_raw(row);
            let processed = ProcessedRow {
                timestamp: row.timestamp.clone(),
                values,
                day_change: values.diff(&baseline),
                change: values.diff(previous),
            };
            *previous = values;
            Some(processed)
        })
        .collect()
}
