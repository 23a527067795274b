//! Display intervals for the trending table

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Interval requested from the history endpoint; the table is resampled from it
pub const SOURCE_INTERVAL: &str = "1m";

/// Supported display intervals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OiInterval {
    OneMinute,
    ThreeMinutes,
    FiveMinutes,
    FifteenMinutes,
    OneHour,
}

impl OiInterval {
    pub const ALL: [OiInterval; 5] = [
        OiInterval::OneMinute,
        OiInterval::ThreeMinutes,
        OiInterval::FiveMinutes,
        OiInterval::FifteenMinutes,
        OiInterval::OneHour,
    ];

    pub fn minutes(self) -> usize {
        match self {
            OiInterval::OneMinute => 1,
            OiInterval::ThreeMinutes => 3,
            OiInterval::FiveMinutes => 5,
            OiInterval::FifteenMinutes => 15,
            OiInterval::OneHour => 60,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OiInterval::OneMinute => "1m",
            OiInterval::ThreeMinutes => "3m",
            OiInterval::FiveMinutes => "5m",
            OiInterval::FifteenMinutes => "15m",
            OiInterval::OneHour => "1h",
        }
    }
}

impl fmt::Display for OiInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OiInterval {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        OiInterval::ALL
            .into_iter()
            .find(|i| i.label() == s)
            .ok_or_else(|| AppError::Validation(format!("Unsupported interval: {}", s)))
    }
}

impl TryFrom<String> for OiInterval {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<OiInterval> for String {
    fn from(value: OiInterval) -> Self {
        value.label().to_string()
    }
}
