//! Domain types for SahamLab

pub mod record;
pub mod score_row;

pub use record::{AccumulationSignal, ForeignFlow, TradingRecord};
pub use score_row::ScoreRow;

/// Stock code type alias (e.g. "BBCA", "TLKM").
pub type StockCode = String;
