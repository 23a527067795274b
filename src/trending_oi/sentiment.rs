//! Futures positioning from price and OI direction

use serde::{Deserialize, Serialize};
use std::fmt;

/// Market sentiment of one interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    #[serde(rename = "Long Buildup")]
    LongBuildup,
    #[serde(rename = "Short Buildup")]
    ShortBuildup,
    #[serde(rename = "Short Cover")]
    ShortCover,
    #[serde(rename = "Long Unwind")]
    LongUnwind,
    /// No signal: price or OI did not move
    #[serde(rename = "None")]
    Neutral,
}

impl Sentiment {
    pub fn label(self) -> &'static str {
        match self {
            Sentiment::LongBuildup => "Long Buildup",
            Sentiment::ShortBuildup => "Short Buildup",
            Sentiment::ShortCover => "Short Cover",
            Sentiment::LongUnwind => "Long Unwind",
            Sentiment::Neutral => "None",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify from the future's price change and OI change
pub fn classify(ltp_change: f64, oi_change: f64) -> Sentiment {
    // Comparisons against NaN are false, so NaN falls through to Neutral
    match (ltp_change > 0.0, ltp_change < 0.0, oi_change > 0.0, oi_change < 0.0) {
        (true, _, true, _) => Sentiment::LongBuildup,
        (true, _, _, true) => Sentiment::ShortCover,
        (_, true, true, _) => Sentiment::ShortBuildup,
        (_, true, _, true) => Sentiment::LongUnwind,
        _ => Sentiment::Neutral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_table() {
        assert_eq!(classify(1.5, 200.0), Sentiment::LongBuildup);
        assert_eq!(classify(2.5, -500.0), Sentiment::ShortCover);
        assert_eq!(classify(-3.0, 750.0), Sentiment::ShortBuildup);
        assert_eq!(classify(-0.05, -25.0), Sentiment::LongUnwind);
    }

    #[test]
    fn test_zero_input_is_neutral() {
        assert_eq!(classify(0.0, 1000.0), Sentiment::Neutral);
        assert_eq!(classify(4.0, 0.0), Sentiment::Neutral);
        assert_eq!(classify(-0.0, -10.0), Sentiment::Neutral);
        assert_eq!(classify(0.0, 0.0), Sentiment::Neutral);
        assert_eq!(classify(f64::NAN, 10.0), Sentiment::Neutral);
    }

    #[test]
    fn test_labels_serialize_as_displayed() {
        assert_eq!(serde_json::to_string(&Sentiment::ShortCover).unwrap(), r#""Short Cover""#);
        assert_eq!(serde_json::to_string(&Sentiment::Neutral).unwrap(), r#""None""#);
        assert_eq!(Sentiment::LongUnwind.to_string(), "Long Unwind");
    }
}
