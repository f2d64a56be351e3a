//! Analysis windows — the lookback intervals every signal is computed over.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// The three lookback lengths screened per request.
pub const DAY_RANGES: [i64; 3] = [30, 60, 90];

/// Length of the secondary sub-window for the volume and VWAP counts.
///
/// Fixed at 5 days regardless of the outer window, and always anchored
/// to the same global anchor date: the 5-day metrics are identical
/// across the 30/60/90-day passes.
pub const FIVE_DAY_WINDOW: i64 = 5;

/// Leaderboard size per window.
pub const TOP_N: usize = 25;

/// A closed lookback interval `[anchor - days, anchor]`.
///
/// The anchor is the maximum trading date in the whole dataset; it is
/// shared by every window of every pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisWindow {
    pub anchor: NaiveDate,
    pub days: i64,
}

impl AnalysisWindow {
    pub fn new(anchor: NaiveDate, days: i64) -> Self {
        Self { anchor, days }
    }

    /// The fixed 5-day sub-window for the same anchor.
    pub fn five_day(anchor: NaiveDate) -> Self {
        Self::new(anchor, FIVE_DAY_WINDOW)
    }

    /// Inclusive lower bound of the window.
    pub fn start(&self) -> NaiveDate {
        self.anchor - Duration::days(self.days)
    }

    /// Whether a trading date falls inside the window.
    ///
    /// Only the lower bound is checked: no row can be dated after the
    /// anchor, because the anchor is the dataset-wide maximum date.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()
    }

    #[test]
    fn lower_bound_is_inclusive() {
        let window = AnalysisWindow::new(anchor(), 30);
        assert_eq!(window.start(), NaiveDate::from_ymd_opt(2024, 5, 29).unwrap());
        assert!(window.contains(window.start()));
        assert!(!window.contains(window.start() - Duration::days(1)));
    }

    #[test]
    fn anchor_is_inside() {
        let window = AnalysisWindow::new(anchor(), 60);
        assert!(window.contains(anchor()));
    }

    #[test]
    fn five_day_window_is_fixed() {
        let window = AnalysisWindow::five_day(anchor());
        assert_eq!(window.days, FIVE_DAY_WINDOW);
        assert!(window.contains(anchor() - Duration::days(5)));
        assert!(!window.contains(anchor() - Duration::days(6)));
    }

    #[test]
    fn day_ranges_are_ascending() {
        assert!(DAY_RANGES.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
