//! Data layer — source-table parsing, providers, raw-CSV cache, synthetic data.

pub mod cache;
pub mod provider;
pub mod synthetic;
pub mod table;

pub use cache::{CacheMeta, CsvCache};
pub use provider::{FetchedTable, HttpCsvProvider, LocalCsvProvider, TableProvider, TableSource};
pub use synthetic::generate_table;
pub use table::{max_trading_date, parse_table, TableError, EXPECTED_COLUMNS};
