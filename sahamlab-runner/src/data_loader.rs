//! Table loading for the runner.
//!
//! Resolves the source table and derives the shared anchor date.
//! Fallback policy:
//! 1. If cached data exists → use it
//! 2. If not cached and a provider is available → fetch; remote fetches
//!    are cached, local-file loads are not
//! 3. If no data and `synthetic` → generate a synthetic table (tagged)
//! 4. Otherwise → fail with a clear error
//!
//! Synthetic data is a developer-only offline mode; results produced on
//! it carry a `has_synthetic` flag all the way into the artifacts.

use chrono::NaiveDate;
use thiserror::Error;

use sahamlab_core::data::{
    generate_table, max_trading_date, CsvCache, TableError, TableProvider, TableSource,
};
use sahamlab_core::domain::TradingRecord;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no cached dataset and network access disabled (use --synthetic for fake data)")]
    NoCachedDataOffline,

    #[error("no cached dataset and download failed: {reason}")]
    DownloadFailed { reason: String },

    #[error("loaded table has no rows")]
    EmptyTable,

    #[error("table error: {0}")]
    Table(#[from] TableError),
}

/// Options controlling how the table is loaded.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// If true, never make network requests.
    pub offline: bool,
    /// If true, generate a synthetic table when real data is unavailable.
    pub synthetic: bool,
    /// Force re-download even if cached.
    pub force: bool,
}

/// The loaded table plus the derived scalars every window pass shares.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub records: Vec<TradingRecord>,
    /// Maximum trading date across all rows.
    pub anchor: NaiveDate,
    /// BLAKE3 fingerprint over the rows, for provenance.
    pub dataset_hash: String,
    pub source: TableSource,
    pub has_synthetic: bool,
}

/// Load the source table from the cache, with fallback to download or
/// synthetic generation.
///
/// This is the primary entry point for the runner to get data.
pub fn load_table(
    cache: &CsvCache,
    provider: Option<&dyn TableProvider>,
    source_url: &str,
    opts: &LoadOptions,
) -> Result<LoadedTable, LoadError> {
    // Step 1: cache
    if !opts.force {
        if let Ok(fetched) = cache.load() {
            return finish(fetched.records, fetched.source, false);
        }
    }

    // Step 2: download and cache
    if !opts.offline {
        if let Some(provider) = provider {
            match provider.fetch() {
                Ok(fetched) => {
                    // Only the remote dataset populates the cache: a local
                    // file must not overwrite the cached published dataset
                    // or have its rows recorded under the source URL.
                    if fetched.source == TableSource::RemoteCsv {
                        cache.write(&fetched.raw_csv, source_url, fetched.records.len())?;
                    }
                    return finish(fetched.records, fetched.source, false);
                }
                Err(e) => {
                    if !opts.synthetic {
                        return Err(LoadError::DownloadFailed {
                            reason: e.to_string(),
                        });
                    }
                    // Fall through to synthetic
                }
            }
        }
    }

    // Step 3: synthetic fallback
    if opts.synthetic {
        eprintln!("WARNING: generating synthetic data — results will be tagged as synthetic");
        let anchor = chrono::Local::now().date_naive();
        let records = generate_table(anchor, 120);
        return finish(records, TableSource::Synthetic, true);
    }

    // Step 4: fail
    if opts.offline {
        return Err(LoadError::NoCachedDataOffline);
    }
    Err(LoadError::DownloadFailed {
        reason: "no provider configured".into(),
    })
}

fn finish(
    records: Vec<TradingRecord>,
    source: TableSource,
    has_synthetic: bool,
) -> Result<LoadedTable, LoadError> {
    let anchor = max_trading_date(&records).ok_or(LoadError::EmptyTable)?;
    let dataset_hash = compute_dataset_hash(&records);
    Ok(LoadedTable {
        records,
        anchor,
        dataset_hash,
        source,
        has_synthetic,
    })
}

/// Deterministic BLAKE3 hash over all rows.
///
/// Rows are hashed in (stock code, date) sorted order so the fingerprint
/// is independent of source row order.
fn compute_dataset_hash(records: &[TradingRecord]) -> String {
    let mut keys: Vec<usize> = (0..records.len()).collect();
    keys.sort_by(|&a, &b| {
        (&records[a].stock_code, records[a].date).cmp(&(&records[b].stock_code, records[b].date))
    });

    let mut hasher = blake3::Hasher::new();
    for &i in &keys {
        let r = &records[i];
        hasher.update(r.stock_code.as_bytes());
        hasher.update(r.date.to_string().as_bytes());
        hasher.update(&r.close.to_le_bytes());
        hasher.update(&r.vwap.to_le_bytes());
        hasher.update(r.signal.as_str().as_bytes());
        hasher.update(&[u8::from(r.unusual_volume)]);
        hasher.update(&r.bid_offer_imbalance.to_le_bytes());
        hasher.update(r.foreign_flow.as_str().as_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
