//! ScoreRow — one stock's derived signals and final score for one window.

use serde::{Deserialize, Serialize};

/// Per-stock result of one window pass.
///
/// The ratio and average fields hold the 2-decimal presentation values;
/// the score is computed from the unrounded signals before this struct
/// is built, so display rounding never feeds back into the ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRow {
    pub stock_code: String,
    pub company_name: String,
    pub sector: String,
    /// Fraction of window days labeled Akumulasi / Strong Akumulasi, in [0, 1].
    pub akumulasi_ratio: f64,
    /// Fraction of window days with foreign Inflow, in [0, 1].
    pub inflow_ratio: f64,
    /// Unusual-volume days in the fixed 5-day sub-window.
    pub unusual_volume_5d: u32,
    /// Mean bid/offer imbalance over the window.
    pub avg_bid_offer: f64,
    /// Days with close above VWAP in the fixed 5-day sub-window.
    pub price_above_vwap_5d: u32,
    /// Close on the anchor date, if the stock traded that day.
    pub last_close: Option<f64>,
    pub score: f64,
}

impl ScoreRow {
    /// Whether every required field is present and finite.
    ///
    /// Rows that fail this check are excluded from ranking before the
    /// top-N cut, so an incomplete row never displaces a complete one.
    pub fn is_complete(&self) -> bool {
        self.last_close.map(f64::is_finite).unwrap_or(false) && self.score.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> ScoreRow {
        ScoreRow {
            stock_code: "BBCA".into(),
            company_name: "Bank Central Asia".into(),
            sector: "Financials".into(),
            akumulasi_ratio: 0.75,
            inflow_ratio: 0.60,
            unusual_volume_5d: 2,
            avg_bid_offer: 0.15,
            price_above_vwap_5d: 3,
            last_close: Some(9200.0),
            score: 9.5,
        }
    }

    #[test]
    fn complete_row() {
        assert!(sample_row().is_complete());
    }

    #[test]
    fn missing_last_close_is_incomplete() {
        let mut row = sample_row();
        row.last_close = None;
        assert!(!row.is_complete());
    }

    #[test]
    fn nan_last_close_is_incomplete() {
        let mut row = sample_row();
        row.last_close = Some(f64::NAN);
        assert!(!row.is_complete());
    }

    #[test]
    fn nan_score_is_incomplete() {
        let mut row = sample_row();
        row.score = f64::NAN;
        assert!(!row.is_complete());
    }

    #[test]
    fn score_row_serialization_roundtrip() {
        let row = sample_row();
        let json = serde_json::to_string(&row).unwrap();
        let deser: ScoreRow = serde_json::from_str(&json).unwrap();
        assert_eq!(row, deser);
    }
}
