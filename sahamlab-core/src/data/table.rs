//! Source-table parsing and validation.
//!
//! The source is a flat CSV with one row per (stock, trading day). Parsing
//! is strict: a missing column or an unparseable date/number is fatal for
//! the whole pipeline — the screen must refuse to run on a malformed
//! table rather than produce silently wrong scores. Unknown categorical
//! labels, by contrast, are valid data and map to their `Other` variants.

use std::io::Read;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{AccumulationSignal, ForeignFlow, TradingRecord};

pub const COL_STOCK_CODE: &str = "Stock Code";
pub const COL_COMPANY_NAME: &str = "Company Name";
pub const COL_SECTOR: &str = "Sector";
pub const COL_DATE: &str = "Last Trading Date";
pub const COL_CLOSE: &str = "Close";
pub const COL_VWAP: &str = "VWAP";
pub const COL_SIGNAL: &str = "Final Signal";
pub const COL_UNUSUAL_VOLUME: &str = "Unusual Volume";
pub const COL_BID_OFFER: &str = "Bid/Offer Imbalance";
pub const COL_FOREIGN_FLOW: &str = "Foreign Flow";

/// Every column the parser requires, by exact header name.
pub const EXPECTED_COLUMNS: [&str; 10] = [
    COL_STOCK_CODE,
    COL_COMPANY_NAME,
    COL_SECTOR,
    COL_DATE,
    COL_CLOSE,
    COL_VWAP,
    COL_SIGNAL,
    COL_UNUSUAL_VOLUME,
    COL_BID_OFFER,
    COL_FOREIGN_FLOW,
];

/// Structured errors for table loading and parsing.
///
/// These are designed to be displayable as-is in the CLI.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("missing expected column: '{column}'")]
    MissingColumn { column: String },

    #[error("row {row}: unparseable date '{value}'")]
    InvalidDate { row: usize, value: String },

    #[error("row {row}: unparseable number '{value}' in column '{column}'")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: unparseable flag '{value}' in column 'Unusual Volume'")]
    InvalidFlag { row: usize, value: String },

    #[error("table has a header but no data rows")]
    EmptyTable,

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by source (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("HTTP {status} from data source")]
    HttpStatus { status: u16 },

    #[error("cache error: {0}")]
    CacheError(String),
}

/// Column indexes resolved once from the header row.
struct ColumnIndex {
    stock_code: usize,
    company_name: usize,
    sector: usize,
    date: usize,
    close: usize,
    vwap: usize,
    signal: usize,
    unusual_volume: usize,
    bid_offer: usize,
    foreign_flow: usize,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, TableError> {
        let find = |column: &str| {
            headers
                .iter()
                .position(|h| h.trim() == column)
                .ok_or_else(|| TableError::MissingColumn {
                    column: column.to_string(),
                })
        };
        Ok(Self {
            stock_code: find(COL_STOCK_CODE)?,
            company_name: find(COL_COMPANY_NAME)?,
            sector: find(COL_SECTOR)?,
            date: find(COL_DATE)?,
            close: find(COL_CLOSE)?,
            vwap: find(COL_VWAP)?,
            signal: find(COL_SIGNAL)?,
            unusual_volume: find(COL_UNUSUAL_VOLUME)?,
            bid_offer: find(COL_BID_OFFER)?,
            foreign_flow: find(COL_FOREIGN_FLOW)?,
        })
    }
}

/// Parse the full source table from a CSV reader.
///
/// Row numbers in errors are 1-based file lines (the header is line 1).
pub fn parse_table(reader: impl Read) -> Result<Vec<TradingRecord>, TableError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = ColumnIndex::resolve(rdr.headers()?)?;

    let mut records = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let row = i + 2;
        let record = result?;
        records.push(parse_row(&record, &columns, row)?);
    }

    if records.is_empty() {
        return Err(TableError::EmptyTable);
    }
    Ok(records)
}

/// The maximum trading date across all rows — the anchor for every window.
pub fn max_trading_date(records: &[TradingRecord]) -> Option<NaiveDate> {
    records.iter().map(|r| r.date).max()
}

fn parse_row(
    record: &csv::StringRecord,
    columns: &ColumnIndex,
    row: usize,
) -> Result<TradingRecord, TableError> {
    let field = |idx: usize| record.get(idx).unwrap_or("");

    Ok(TradingRecord {
        stock_code: field(columns.stock_code).to_string(),
        company_name: field(columns.company_name).to_string(),
        sector: field(columns.sector).to_string(),
        date: parse_date(field(columns.date), row)?,
        close: parse_number(field(columns.close), COL_CLOSE, row)?,
        vwap: parse_number(field(columns.vwap), COL_VWAP, row)?,
        signal: AccumulationSignal::from(field(columns.signal).to_string()),
        unusual_volume: parse_flag(field(columns.unusual_volume), row)?,
        bid_offer_imbalance: parse_number(field(columns.bid_offer), COL_BID_OFFER, row)?,
        foreign_flow: ForeignFlow::from(field(columns.foreign_flow).to_string()),
    })
}

fn parse_date(value: &str, row: usize) -> Result<NaiveDate, TableError> {
    // ISO first; slash variants show up in hand-exported sheets.
    for format in ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date);
        }
    }
    // Datetime-stamped exports ("2024-06-28 00:00:00").
    if let Some(prefix) = value.split_whitespace().next() {
        if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return Ok(date);
        }
    }
    Err(TableError::InvalidDate {
        row,
        value: value.to_string(),
    })
}

fn parse_number(value: &str, column: &str, row: usize) -> Result<f64, TableError> {
    value.parse::<f64>().map_err(|_| TableError::InvalidNumber {
        row,
        column: column.to_string(),
        value: value.to_string(),
    })
}

/// The unusual-volume flag appears as 0/1 in some exports and
/// True/False in others.
fn parse_flag(value: &str, row: usize) -> Result<bool, TableError> {
    match value {
        "1" | "true" | "True" | "TRUE" => Ok(true),
        "0" | "" | "false" | "False" | "FALSE" => Ok(false),
        other => {
            if let Ok(v) = other.parse::<f64>() {
                Ok(v != 0.0)
            } else {
                Err(TableError::InvalidFlag {
                    row,
                    value: other.to_string(),
                })
            }
        }
    }
}
