//! Strike selection for the aggregated basket

use serde::{Deserialize, Serialize};

const STRIKE_TOLERANCE: f64 = 1e-6;

/// Set of strikes allowed into the OI and volume sums
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrikeSet(Vec<f64>);

impl StrikeSet {
    pub fn new(mut strikes: Vec<f64>) -> Self {
        strikes.retain(|s| s.is_finite());
        strikes.sort_by(f64::total_cmp);
        strikes.dedup_by(|a, b| (*a - *b).abs() < STRIKE_TOLERANCE);
        Self(strikes)
    }

    pub fn contains(&self, strike: f64) -> bool {
        self.0.iter().any(|s| (s - strike).abs() < STRIKE_TOLERANCE)
    }

    pub fn strikes(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// How the user picked strikes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StrikeSelection {
    /// Every strike in the chain
    All,
    /// ATM plus `strikes_each_side` neighbours above and below
    Auto { strikes_each_side: usize },
    Custom { strikes: Vec<f64> },
}

impl StrikeSelection {
    /// Resolve against the chain's available strikes. `None` means no filter.
    pub fn resolve(&self, available: &[f64], atm_strike: f64) -> Option<StrikeSet> {
        match self {
            StrikeSelection::All => None,
            StrikeSelection::Custom { strikes } => Some(StrikeSet::new(strikes.clone())),
            StrikeSelection::Auto { strikes_each_side } => {
                let ladder = StrikeSet::new(available.to_vec());
                let strikes = ladder.strikes();

                let Some(atm_index) = nearest_index(strikes, atm_strike) else {
                    return Some(StrikeSet::default());
                };

                let start = atm_index.saturating_sub(*strikes_each_side);
                let end = atm_index
                    .saturating_add(*strikes_each_side)
                    .saturating_add(1)
                    .min(strikes.len());
                Some(StrikeSet::new(strikes[start..end].to_vec()))
            }
        }
    }
}

/// Index of the strike closest to `target`; ties go to the lower strike
fn nearest_index(sorted: &[f64], target: f64) -> Option<usize> {
    sorted
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (*a - target).abs().total_cmp(&(*b - target).abs()))
        .map(|(i, _)| i)
}
