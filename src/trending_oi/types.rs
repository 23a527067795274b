//! Core types for the Trending OI pipeline

use crate::error::{AppError, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::{Asia::Kolkata, Tz};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Column names expected in the columnar dataset
pub mod columns {
    pub const OI: &str = "oi";
    pub const LTP: &str = "ltp";
    pub const VOLUME: &str = "volume";
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ============================================================================
// Symbol identity
// ============================================================================

/// Contract identity, written on the wire as `EXCHANGE:SYMBOL`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolKey {
    pub exchange: String,
    pub symbol: String,
}

impl SymbolKey {
    pub fn new(exchange: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            exchange: exchange.into(),
            symbol: symbol.into(),
        }
    }
}

impl fmt::Display for SymbolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.exchange, self.symbol)
    }
}

impl FromStr for SymbolKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((exchange, symbol)) if !exchange.is_empty() && !symbol.is_empty() => {
                Ok(SymbolKey::new(exchange, symbol))
            }
            _ => Err(AppError::Validation(format!(
                "Invalid symbol key '{}', expected EXCHANGE:SYMBOL",
                s
            ))),
        }
    }
}

impl Serialize for SymbolKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SymbolKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Contract type as reported by the contract chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractType {
    #[serde(rename = "CE", alias = "CALL")]
    Call,
    #[serde(rename = "PE", alias = "PUT")]
    Put,
    #[serde(rename = "FUT", alias = "FUTURE")]
    Future,
}

/// Classification of one contract in the basket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SymbolMeta {
    #[serde(rename = "type")]
    pub contract_type: ContractType,
    pub strike: Option<f64>,
}

/// Contract metadata keyed by symbol, ordered so aggregation is deterministic
pub type SymbolMetaMap = BTreeMap<SymbolKey, SymbolMeta>;

// ============================================================================
// Timestamps
// ============================================================================

/// Sample timestamp as delivered by the history endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// Unix epoch, seconds or milliseconds
    Epoch(i64),
    Text(String),
}

/// Accepts integer or float epochs as well as text
impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum FlexibleTimestamp {
            Int(i64),
            Float(f64),
            Text(String),
        }

        Ok(match FlexibleTimestamp::deserialize(deserializer)? {
            FlexibleTimestamp::Int(value) => Timestamp::Epoch(value),
            FlexibleTimestamp::Float(value) if value.is_finite() => Timestamp::Epoch(value.trunc() as i64),
            FlexibleTimestamp::Float(value) => Timestamp::Text(value.to_string()),
            FlexibleTimestamp::Text(text) => Timestamp::Text(text),
        })
    }
}

impl Timestamp {
    /// Resolve to exchange local time (IST)
    pub fn to_local(&self) -> Option<DateTime<Tz>> {
        match self {
            Timestamp::Epoch(value) => epoch_to_local(*value),
            Timestamp::Text(text) => {
                if let Ok(value) = text.parse::<i64>() {
                    return epoch_to_local(value);
                }
                if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
                    return Some(dt.with_timezone(&Kolkata));
                }
                // Naive timestamps are already exchange local time
                NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
                    .ok()
                    .and_then(|naive| Kolkata.from_local_datetime(&naive).single())
            }
        }
    }

    /// `HH:MM` label in exchange local time, or the raw value if unparseable
    pub fn time_label(&self) -> String {
        match self.to_local() {
            Some(dt) => dt.format("%H:%M").to_string(),
            None => match self {
                Timestamp::Epoch(value) => value.to_string(),
                Timestamp::Text(text) => text.clone(),
            },
        }
    }
}

fn epoch_to_local(value: i64) -> Option<DateTime<Tz>> {
    let secs = if value.unsigned_abs() >= 1_000_000_000_000 {
        value / 1000
    } else {
        value
    };
    Utc.timestamp_opt(secs, 0)
        .single()
        .map(|dt| dt.with_timezone(&Kolkata))
}

// ============================================================================
// Columnar input
// ============================================================================

/// Wide per-minute dataset: `symbol_data[key][column][time]`
#[derive(Debug, Clone, Default)]
pub struct ColumnarDataset {
    pub timestamps: Vec<Timestamp>,
    pub columns: Vec<String>,
    pub symbol_data: HashMap<SymbolKey, Vec<Vec<f64>>>,
}

impl ColumnarDataset {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Position of a named column
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.eq_ignore_ascii_case(name))
    }

    /// Value of one cell. Anything missing or non-finite reads as zero.
    pub fn value(&self, key: &SymbolKey, column: Option<usize>, index: usize) -> f64 {
        column
            .and_then(|c| self.symbol_data.get(key)?.get(c)?.get(index).copied())
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }
}

// ============================================================================
// Aggregated rows
// ============================================================================

/// Basket totals at one timestamp
///
/// OI and LTP fields are snapshots; volume fields are cumulative for the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAggregateRow {
    pub timestamp: Timestamp,
    pub ce_oi: f64,
    pub pe_oi: f64,
    pub ce_volume: f64,
    pub pe_volume: f64,
    pub fut_ltp: f64,
    pub fut_oi: f64,
    pub fut_volume: f64,
}

/// Metrics carried by every processed row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    CeOi,
    PeOi,
    CeVolume,
    PeVolume,
    FutLtp,
    FutOi,
    FutVolume,
    PeCeOi,
    Pcr,
}

impl Metric {
    pub const ALL: [Metric; 9] = [
        Metric::CeOi,
        Metric::PeOi,
        Metric::CeVolume,
        Metric::PeVolume,
        Metric::FutLtp,
        Metric::FutOi,
        Metric::FutVolume,
        Metric::PeCeOi,
        Metric::Pcr,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metric::CeOi => "ce_oi",
            Metric::PeOi => "pe_oi",
            Metric::CeVolume => "ce_volume",
            Metric::PeVolume => "pe_volume",
            Metric::FutLtp => "fut_ltp",
            Metric::FutOi => "fut_oi",
            Metric::FutVolume => "fut_volume",
            Metric::PeCeOi => "pe_ce_oi",
            Metric::Pcr => "pcr",
        }
    }
}

impl FromStr for Metric {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        Metric::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| AppError::Validation(format!("Unknown metric: {}", s)))
    }
}

/// One value per metric
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricSet {
    pub ce_oi: f64,
    pub pe_oi: f64,
    pub ce_volume: f64,
    pub pe_volume: f64,
    pub fut_ltp: f64,
    pub fut_oi: f64,
    pub fut_volume: f64,
    pub pe_ce_oi: f64,
    pub pcr: f64,
}

impl MetricSet {
    /// Take the raw totals and derive `pe_ce_oi` and `pcr`
    pub fn from_raw(row: &RawAggregateRow) -> Self {
        let pcr = if row.ce_oi == 0.0 {
            0.0
        } else {
            round2(row.pe_oi / row.ce_oi)
        };

        Self {
            ce_oi: row.ce_oi,
            pe_oi: row.pe_oi,
            ce_volume: row.ce_volume,
            pe_volume: row.pe_volume,
            fut_ltp: row.fut_ltp,
            fut_oi: row.fut_oi,
            fut_volume: row.fut_volume,
            pe_ce_oi: row.pe_oi - row.ce_oi,
            pcr,
        }
    }

    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::CeOi => self.ce_oi,
            Metric::PeOi => self.pe_oi,
            Metric::CeVolume => self.ce_volume,
            Metric::PeVolume => self.pe_volume,
            Metric::FutLtp => self.fut_ltp,
            Metric::FutOi => self.fut_oi,
            Metric::FutVolume => self.fut_volume,
            Metric::PeCeOi => self.pe_ce_oi,
            Metric::Pcr => self.pcr,
        }
    }

    /// Element-wise `self - baseline`; the PCR difference stays at two decimals
    pub fn diff(&self, baseline: &MetricSet) -> MetricSet {
        MetricSet {
            ce_oi: self.ce_oi - baseline.ce_oi,
            pe_oi: self.pe_oi - baseline.pe_oi,
            ce_volume: self.ce_volume - baseline.ce_volume,
            pe_volume: self.pe_volume - baseline.pe_volume,
            fut_ltp: self.fut_ltp - baseline.fut_ltp,
            fut_oi: self.fut_oi - baseline.fut_oi,
            fut_volume: self.fut_volume - baseline.fut_volume,
            pe_ce_oi: self.pe_ce_oi - baseline.pe_ce_oi,
            pcr: round2(self.pcr - baseline.pcr),
        }
    }
}

// ============================================================================
// Processed rows and column addressing
// ============================================================================

/// Which of the three values of a metric a column shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Value,
    DayChange,
    Change,
}

/// Typed name of a displayed column, e.g. `ce_oi_day_change`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnKey {
    pub metric: Metric,
    pub kind: ColumnKind,
}

impl ColumnKey {
    pub fn new(metric: Metric, kind: ColumnKind) -> Self {
        Self { metric, kind }
    }

    /// Every column a processed row exposes
    pub fn all() -> impl Iterator<Item = ColumnKey> {
        Metric::ALL.into_iter().flat_map(|metric| {
            [ColumnKind::Value, ColumnKind::DayChange, ColumnKind::Change]
                .into_iter()
                .map(move |kind| ColumnKey::new(metric, kind))
        })
    }

    pub fn name(&self) -> String {
        match self.kind {
            ColumnKind::Value => self.metric.name().to_string(),
            ColumnKind::DayChange => format!("{}_day_change", self.metric.name()),
            ColumnKind::Change => format!("{}_change", self.metric.name()),
        }
    }
}

impl FromStr for ColumnKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(base) = s.strip_suffix("_day_change") {
            return Ok(ColumnKey::new(base.parse()?, ColumnKind::DayChange));
        }
        if let Some(base) = s.strip_suffix("_change") {
            return Ok(ColumnKey::new(base.parse()?, ColumnKind::Change));
        }
        Ok(ColumnKey::new(s.parse()?, ColumnKind::Value))
    }
}

/// One resampled interval with its two classes of change
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedRow {
    pub timestamp: Timestamp,
    pub values: MetricSet,
    /// Against the first raw sample of the day
    pub day_change: MetricSet,
    /// Against the previous processed row
    pub change: MetricSet,
}

impl ProcessedRow {
    pub fn column(&self, key: ColumnKey) -> f64 {
        match key.kind {
            ColumnKind::Value => self.values.get(key.metric),
            ColumnKind::DayChange => self.day_change.get(key.metric),
            ColumnKind::Change => self.change.get(key.metric),
        }
    }
}

// Flat `<metric>`, `<metric>_day_change`, `<metric>_change` layout for the table
impl Serialize for ProcessedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2 + Metric::ALL.len() * 3))?;
        map.serialize_entry("timestamp", &self.timestamp)?;
        map.serialize_entry("time", &self.timestamp.time_label())?;
        for key in ColumnKey::all() {
            map.serialize_entry(&key.name(), &self.column(key))?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_key_roundtrip() {
        let key: SymbolKey = "NFO:NIFTY30JAN2523500CE".parse().unwrap();
        assert_eq!(key.exchange, "NFO");
        assert_eq!(key.symbol, "NIFTY30JAN2523500CE");
        assert_eq!(key.to_string(), "NFO:NIFTY30JAN2523500CE");

        assert!("NIFTY".parse::<SymbolKey>().is_err());
        assert!(":NIFTY".parse::<SymbolKey>().is_err());
    }

    #[test]
    fn test_symbol_key_as_json_map_key() {
        let mut data: HashMap<SymbolKey, u32> = HashMap::new();
        data.insert(SymbolKey::new("NFO", "NIFTYFUT"), 1);
        let json = serde_json::to_string(&data).unwrap();
        assert_eq!(json, r#"{"NFO:NIFTYFUT":1}"#);

        let back: HashMap<SymbolKey, u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn test_pcr_zero_when_no_calls() {
        let row = RawAggregateRow {
            timestamp: Timestamp::Epoch(0),
            ce_oi: 0.0,
            pe_oi: 500.0,
            ce_volume: 0.0,
            pe_volume: 0.0,
            fut_ltp: 0.0,
            fut_oi: 0.0,
            fut_volume: 0.0,
        };
        let metrics = MetricSet::from_raw(&row);
        assert_eq!(metrics.pcr, 0.0);
        assert_eq!(metrics.pe_ce_oi, 500.0);
    }

    #[test]
    fn test_column_key_parsing() {
        let key: ColumnKey = "pe_ce_oi_change".parse().unwrap();
        assert_eq!(key, ColumnKey::new(Metric::PeCeOi, ColumnKind::Change));

        let key: ColumnKey = "fut_oi_day_change".parse().unwrap();
        assert_eq!(key, ColumnKey::new(Metric::FutOi, ColumnKind::DayChange));

        let key: ColumnKey = "pcr".parse().unwrap();
        assert_eq!(key, ColumnKey::new(Metric::Pcr, ColumnKind::Value));

        assert!("iv_change".parse::<ColumnKey>().is_err());
        assert_eq!(ColumnKey::all().count(), 27);
    }

    #[test]
    fn test_time_label_in_ist() {
        // 2025-01-30 03:45:00 UTC is 09:15 IST
        assert_eq!(Timestamp::Epoch(1_738_208_700).time_label(), "09:15");
        assert_eq!(Timestamp::Epoch(1_738_208_700_000).time_label(), "09:15");
        assert_eq!(
            Timestamp::Text("2025-01-30 09:20:00".to_string()).time_label(),
            "09:20"
        );
        assert_eq!(
            Timestamp::Text("2025-01-30T04:00:00Z".to_string()).time_label(),
            "09:30"
        );
        assert_eq!(Timestamp::Text("open".to_string()).time_label(), "open");
    }

    #[test]
    fn test_extreme_epoch_does_not_panic() {
        assert_eq!(Timestamp::Epoch(i64::MIN).time_label(), i64::MIN.to_string());
        assert!(Timestamp::Epoch(i64::MAX).to_local().is_none());
    }

    #[test]
    fn test_timestamp_accepts_float_epochs() {
        let parsed: Vec<Timestamp> =
            serde_json::from_str(r#"[1738208700, 1738208760.0, 1738208820000.0, "2025-01-30 09:18:00"]"#).unwrap();
        assert_eq!(parsed[0], Timestamp::Epoch(1_738_208_700));
        assert_eq!(parsed[1], Timestamp::Epoch(1_738_208_760));
        assert_eq!(parsed[2].time_label(), "09:17");
        assert_eq!(parsed[3].time_label(), "09:18");
    }

    #[test]
    fn test_processed_row_serializes_flat() {
        let values = MetricSet {
            ce_oi: 110.0,
            pcr: 0.86,
            ..Default::default()
        };
        let row = ProcessedRow {
            timestamp: Timestamp::Epoch(1_738_208_700),
            values,
            day_change: MetricSet {
                ce_oi: 10.0,
                ..Default::default()
            },
            change: MetricSet::default(),
        };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["time"], "09:15");
        assert_eq!(json["ce_oi"], 110.0);
        assert_eq!(json["ce_oi_day_change"], 10.0);
        assert_eq!(json["ce_oi_change"], 0.0);
        assert_eq!(json["pcr"], 0.86);
    }
}
