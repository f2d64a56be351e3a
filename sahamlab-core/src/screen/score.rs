//! Scorer — the fixed-weight additive accumulation score.

use super::aggregate::WindowSignals;

/// Highest achievable score: 3 + 2 + 2 + 3 + 1.
pub const MAX_SCORE: f64 = 11.0;

/// Compute the accumulation score from one stock's window signals.
///
/// Weights are fixed and additive, with no normalization:
/// - +3 if the accumulation ratio exceeds 0.6
/// - +2 if at least 2 unusual-volume days in the 5-day sub-window
/// - +2 if the inflow ratio exceeds 0.5
/// - +min(3, avg imbalance x 10) if the average imbalance is strictly
///   positive; a non-positive average contributes exactly 0, never a
///   negative term
/// - +1 if close beat VWAP on at least 2 of the last 5 days
///
/// Result is in [0, 11]. Callers round for presentation; this function
/// never does.
pub fn score(signals: &WindowSignals) -> f64 {
    let mut score = 0.0;
    if signals.akumulasi_ratio > 0.6 {
        score += 3.0;
    }
    if signals.unusual_volume_5d >= 2 {
        score += 2.0;
    }
    if signals.inflow_ratio > 0.5 {
        score += 2.0;
    }
    if signals.avg_bid_offer > 0.0 {
        score += (signals.avg_bid_offer * 10.0).min(3.0);
    }
    if signals.price_above_vwap_5d >= 2 {
        score += 1.0;
    }
    score
}
