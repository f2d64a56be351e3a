//! The screening pipeline — window selection, aggregation, scoring, ranking.
//!
//! Control flow: partition the table by stock code, reduce each partition
//! to at most one [`ScoreRow`](crate::domain::ScoreRow) via
//! [`analyze_stock`], then sort descending by score and keep the top N.
//! Each window length (30/60/90 days) is an independent pass over the
//! same immutable table and the same anchor date.

pub mod aggregate;
pub mod rank;
pub mod score;
pub mod window;

pub use aggregate::{analyze_group, analyze_stock, WindowSignals};
pub use rank::{screen, Leaderboard};
pub use score::{score, MAX_SCORE};
pub use window::{AnalysisWindow, DAY_RANGES, FIVE_DAY_WINDOW, TOP_N};

/// Round to 2 decimal places for presentation, ties to even.
///
/// Applied to ratios, the average imbalance, and the final score — always
/// after the score itself has been computed from the unrounded values.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
