//! Table providers — where the source table comes from.
//!
//! The `TableProvider` trait abstracts over the remote CSV endpoint, a
//! local file, and test fakes. The cache layer sits above this trait;
//! providers don't know about the cache.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::table::{parse_table, TableError};
use crate::domain::TradingRecord;

/// Where a loaded table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableSource {
    RemoteCsv,
    LocalCsv,
    Cache,
    Synthetic,
}

/// A successfully fetched and parsed table.
///
/// The raw CSV text is kept alongside the parsed rows so the loader can
/// cache exactly what the source served.
#[derive(Debug, Clone)]
pub struct FetchedTable {
    pub raw_csv: String,
    pub records: Vec<TradingRecord>,
    pub source: TableSource,
}

/// Trait for table sources (remote CSV, local file, etc).
pub trait TableProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch and parse the full table.
    fn fetch(&self) -> Result<FetchedTable, TableError>;
}

/// Fetches the dataset CSV over HTTP with retry and backoff.
pub struct HttpCsvProvider {
    client: reqwest::blocking::Client,
    url: String,
    max_retries: u32,
    base_delay: Duration,
}

impl HttpCsvProvider {
    pub fn new(url: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("sahamlab/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            url: url.into(),
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn fetch_with_retry(&self) -> Result<String, TableError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                std::thread::sleep(delay);
            }

            match self.client.get(&self.url).send() {
                Ok(resp) => {
                    let status = resp.status();

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = resp
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok())
                            .unwrap_or(60);
                        last_error = Some(TableError::RateLimited {
                            retry_after_secs: retry_after,
                        });
                        continue;
                    }

                    if !status.is_success() {
                        last_error = Some(TableError::HttpStatus {
                            status: status.as_u16(),
                        });
                        continue;
                    }

                    return resp
                        .text()
                        .map_err(|e| TableError::NetworkUnreachable(e.to_string()));
                }
                Err(e) => {
                    if e.is_connect() || e.is_timeout() {
                        last_error = Some(TableError::NetworkUnreachable(e.to_string()));
                        continue;
                    }
                    return Err(TableError::NetworkUnreachable(e.to_string()));
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| TableError::NetworkUnreachable("max retries exceeded".into())))
    }
}

impl TableProvider for HttpCsvProvider {
    fn name(&self) -> &str {
        "remote_csv"
    }

    fn fetch(&self) -> Result<FetchedTable, TableError> {
        let raw_csv = self.fetch_with_retry()?;
        let records = parse_table(raw_csv.as_bytes())?;
        Ok(FetchedTable {
            raw_csv,
            records,
            source: TableSource::RemoteCsv,
        })
    }
}

/// Reads the dataset CSV from a local file.
pub struct LocalCsvProvider {
    path: PathBuf,
}

impl LocalCsvProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TableProvider for LocalCsvProvider {
    fn name(&self) -> &str {
        "local_csv"
    }

    fn fetch(&self) -> Result<FetchedTable, TableError> {
        let raw_csv = std::fs::read_to_string(&self.path)?;
        let records = parse_table(raw_csv.as_bytes())?;
        Ok(FetchedTable {
            raw_csv,
            records,
            source: TableSource::LocalCsv,
        })
    }
}
