//! Row filter & aggregator — reduces one stock's history to scalar signals.
//!
//! Given all rows for one stock, the anchor date, and a window length,
//! [`analyze_stock`] selects the relevant sub-ranges and reduces them to
//! the five signals the scorer consumes. An empty window yields `None`:
//! the stock simply doesn't participate in that pass. That is an expected
//! outcome, not an error.

use chrono::NaiveDate;

use super::score::score;
use super::window::AnalysisWindow;
use super::round2;
use crate::domain::{ScoreRow, TradingRecord};

/// The unrounded scalar signals for one stock and one window.
///
/// The scorer consumes these directly; the 2-decimal rounding on the
/// [`ScoreRow`] happens only after the score is computed.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSignals {
    pub akumulasi_ratio: f64,
    pub inflow_ratio: f64,
    pub unusual_volume_5d: u32,
    pub avg_bid_offer: f64,
    pub price_above_vwap_5d: u32,
}

/// Analyze one stock's full history for a single window.
///
/// Returns `None` when the stock has no rows inside the window.
pub fn analyze_stock(
    records: &[TradingRecord],
    anchor: NaiveDate,
    days: i64,
) -> Option<ScoreRow> {
    let refs: Vec<&TradingRecord> = records.iter().collect();
    analyze_group(&refs, anchor, days)
}

/// Borrowed-slice variant of [`analyze_stock`], used by the grouping pass.
///
/// `group` must hold all rows for one stock in source order. Both windows
/// are selected from the full group independently — the 5-day sub-window
/// is never a slice of the outer window.
pub fn analyze_group(
    group: &[&TradingRecord],
    anchor: NaiveDate,
    days: i64,
) -> Option<ScoreRow> {
    let outer = AnalysisWindow::new(anchor, days);
    let recent: Vec<&TradingRecord> = group
        .iter()
        .copied()
        .filter(|r| outer.contains(r.date))
        .collect();
    if recent.is_empty() {
        return None;
    }

    let five = AnalysisWindow::five_day(anchor);
    let recent5: Vec<&TradingRecord> = group
        .iter()
        .copied()
        .filter(|r| five.contains(r.date))
        .collect();

    let total = recent.len() as f64;
    let signals = WindowSignals {
        akumulasi_ratio: recent.iter().filter(|r| r.signal.is_accumulation()).count() as f64
            / total,
        inflow_ratio: recent.iter().filter(|r| r.foreign_flow.is_inflow()).count() as f64 / total,
        unusual_volume_5d: recent5.iter().filter(|r| r.unusual_volume).count() as u32,
        avg_bid_offer: recent.iter().map(|r| r.bid_offer_imbalance).sum::<f64>() / total,
        price_above_vwap_5d: recent5.iter().filter(|r| r.close > r.vwap).count() as u32,
    };

    // Score from the unrounded signals, then round for presentation.
    let raw_score = score(&signals);

    // The close on the anchor date itself, if this stock traded that day.
    // Absent is absent — never zero, never an error; the ranker drops
    // incomplete rows before the top-N cut.
    let last_close = group.iter().find(|r| r.date == anchor).map(|r| r.close);

    let head = group.first()?;
    Some(ScoreRow {
        stock_code: head.stock_code.clone(),
        company_name: head.company_name.clone(),
        sector: head.sector.clone(),
        akumulasi_ratio: round2(signals.akumulasi_ratio),
        inflow_ratio: round2(signals.inflow_ratio),
        unusual_volume_5d: signals.unusual_volume_5d,
        avg_bid_offer: round2(signals.avg_bid_offer),
        price_above_vwap_5d: signals.price_above_vwap_5d,
        last_close,
        score: round2(raw_score),
    })
}
