//! TradingRecord — one row of the source table, plus its categorical columns.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily accumulation-phase label assigned to a stock by the upstream
/// signal pipeline.
///
/// Only `Akumulasi` and `StrongAkumulasi` count toward the accumulation
/// ratio. Labels we don't recognize are preserved verbatim in `Other` —
/// an unknown category is data, not a parse error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccumulationSignal {
    Akumulasi,
    StrongAkumulasi,
    Distribusi,
    StrongDistribusi,
    Netral,
    Other(String),
}

impl AccumulationSignal {
    /// True for the two labels that count toward the accumulation ratio.
    pub fn is_accumulation(&self) -> bool {
        matches!(self, Self::Akumulasi | Self::StrongAkumulasi)
    }

    /// The source-table string form of this label.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Akumulasi => "Akumulasi",
            Self::StrongAkumulasi => "Strong Akumulasi",
            Self::Distribusi => "Distribusi",
            Self::StrongDistribusi => "Strong Distribusi",
            Self::Netral => "Netral",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for AccumulationSignal {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Akumulasi" => Self::Akumulasi,
            "Strong Akumulasi" => Self::StrongAkumulasi,
            "Distribusi" => Self::Distribusi,
            "Strong Distribusi" => Self::StrongDistribusi,
            "Netral" => Self::Netral,
            _ => Self::Other(label),
        }
    }
}

impl From<AccumulationSignal> for String {
    fn from(signal: AccumulationSignal) -> Self {
        signal.as_str().to_string()
    }
}

/// Direction of foreign-investor net trading on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ForeignFlow {
    Inflow,
    Outflow,
    Netral,
    Other(String),
}

impl ForeignFlow {
    /// True only for `Inflow` — the label that counts toward the inflow ratio.
    pub fn is_inflow(&self) -> bool {
        matches!(self, Self::Inflow)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Inflow => "Inflow",
            Self::Outflow => "Outflow",
            Self::Netral => "Netral",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for ForeignFlow {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Inflow" => Self::Inflow,
            "Outflow" => Self::Outflow,
            "Netral" => Self::Netral,
            _ => Self::Other(label),
        }
    }
}

impl From<ForeignFlow> for String {
    fn from(flow: ForeignFlow) -> Self {
        flow.as_str().to_string()
    }
}

/// One row of the source table: a single stock on a single trading day.
///
/// (stock_code, date) is effectively unique in real datasets but the
/// pipeline never relies on it. Rows are value types — the grouping pass
/// keys on `stock_code` and nothing else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingRecord {
    pub stock_code: String,
    pub company_name: String,
    pub sector: String,
    pub date: NaiveDate,
    pub close: f64,
    pub vwap: f64,
    pub signal: AccumulationSignal,
    pub unusual_volume: bool,
    pub bid_offer_imbalance: f64,
    pub foreign_flow: ForeignFlow,
}
