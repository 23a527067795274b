//! Interval resampling of 1-minute aggregate rows

use super::types::RawAggregateRow;

/// Group rows into consecutive windows of `interval_minutes` rows.
///
/// Each output row is labelled with the window's first timestamp and carries
/// the window's last (closing) values. A short trailing window is kept as is.
/// An interval of 0 behaves like 1.
pub fn resample(rows: &[RawAggregateRow], interval_minutes: usize) -> Vec<RawAggregateRow> {
    rows.chunks(interval_minutes.max(1))
        .filter_map(|window| {
            let first = window.first()?;
            let last = window.last()?;
            Some(RawAggregateRow {
                timestamp: first.timestamp.clone(),
                ..last.clone()
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trending_oi::types::Timestamp;

    fn row(minute: i64, ce_oi: f64, pe_oi: f64) -> RawAggregateRow {
        RawAggregateRow {
            timestamp: Timestamp::Epoch(1_738_208_700 + minute * 60),
            ce_oi,
            pe_oi,
            ce_volume: minute as f64 * 10.0,
            pe_volume: minute as f64 * 5.0,
            fut_ltp: 23500.0 + minute as f64,
            fut_oi: 1000.0,
            fut_volume: minute as f64,
        }
    }

    fn series(len: i64) -> Vec<RawAggregateRow> {
        (0..len).map(|m| row(m, 100.0 + m as f64, 80.0 + m as f64)).collect()
    }

    #[test]
    fn test_identity_at_one_minute() {
        let rows = series(7);
        assert_eq!(resample(&rows, 1), rows);
        assert_eq!(resample(&rows, 0), rows);
    }

    #[test]
    fn test_open_label_close_values() {
        let rows = vec![row(0, 100.0, 80.0), row(1, 120.0, 90.0), row(2, 110.0, 95.0)];
        let out = resample(&rows, 3);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].timestamp, rows[0].timestamp);
        assert_eq!(out[0].ce_oi, 110.0);
        assert_eq!(out[0].pe_oi, 95.0);
        assert_eq!(out[0].ce_volume, 20.0);
    }

    #[test]
    fn test_trailing_partial_window_kept() {
        let rows = series(7);
        let out = resample(&rows, 3);

        assert_eq!(out.len(), 3);
        assert_eq!(out[1].timestamp, rows[3].timestamp);
        assert_eq!(out[1].ce_oi, rows[5].ce_oi);
        // Last window holds only minute 6
        assert_eq!(out[2].timestamp, rows[6].timestamp);
        assert_eq!(out[2].fut_ltp, rows[6].fut_ltp);
    }

    #[test]
    fn test_empty_input() {
        assert!(resample(&[], 5).is_empty());
    }
}
