//! Raw-CSV cache — one dataset file plus a metadata sidecar.
//!
//! Layout: `{cache_dir}/dataset.csv` + `{cache_dir}/meta.json`.
//! Writes are atomic (write to .tmp, rename into place). The cache stores
//! the CSV exactly as served so a cached load goes through the same parse
//! path as a fresh download.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::provider::{FetchedTable, TableSource};
use super::table::{parse_table, TableError};

/// Metadata sidecar for the cached dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMeta {
    pub source_url: String,
    pub row_count: usize,
    pub data_hash: String,
    pub cached_at: chrono::NaiveDateTime,
}

/// The raw-CSV dataset cache.
pub struct CsvCache {
    cache_dir: PathBuf,
}

impl CsvCache {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn dataset_path(&self) -> PathBuf {
        self.cache_dir.join("dataset.csv")
    }

    fn meta_path(&self) -> PathBuf {
        self.cache_dir.join("meta.json")
    }

    /// Whether a cached dataset exists.
    pub fn is_populated(&self) -> bool {
        self.dataset_path().exists()
    }

    /// Cache the raw CSV as served, with metadata.
    pub fn write(&self, raw_csv: &str, source_url: &str, row_count: usize) -> Result<(), TableError> {
        if raw_csv.is_empty() {
            return Err(TableError::CacheError("refusing to cache empty CSV".into()));
        }

        fs::create_dir_all(&self.cache_dir)
            .map_err(|e| TableError::CacheError(format!("failed to create dir: {e}")))?;

        let path = self.dataset_path();
        let tmp_path = path.with_extension("csv.tmp");
        fs::write(&tmp_path, raw_csv)
            .map_err(|e| TableError::CacheError(format!("dataset write: {e}")))?;
        fs::rename(&tmp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            TableError::CacheError(format!("atomic rename failed: {e}"))
        })?;

        let meta = CacheMeta {
            source_url: source_url.to_string(),
            row_count,
            data_hash: blake3::hash(raw_csv.as_bytes()).to_hex().to_string(),
            cached_at: chrono::Local::now().naive_local(),
        };
        let meta_json = serde_json::to_string_pretty(&meta)
            .map_err(|e| TableError::CacheError(format!("meta serialization: {e}")))?;
        fs::write(self.meta_path(), meta_json)
            .map_err(|e| TableError::CacheError(format!("meta write: {e}")))?;

        Ok(())
    }

    /// Load and parse the cached dataset.
    pub fn load(&self) -> Result<FetchedTable, TableError> {
        let raw_csv = fs::read_to_string(self.dataset_path())
            .map_err(|e| TableError::CacheError(format!("no cached dataset: {e}")))?;
        let records = parse_table(raw_csv.as_bytes())?;
        Ok(FetchedTable {
            raw_csv,
            records,
            source: TableSource::Cache,
        })
    }

    /// Read the metadata sidecar.
    pub fn meta(&self) -> Result<CacheMeta, TableError> {
        let content = fs::read_to_string(self.meta_path())
            .map_err(|e| TableError::CacheError(format!("no cache metadata: {e}")))?;
        serde_json::from_str(&content)
            .map_err(|e| TableError::CacheError(format!("corrupt cache metadata: {e}")))
    }

    /// Remove the cached dataset and its metadata.
    pub fn clear(&self) -> Result<(), TableError> {
        for path in [self.dataset_path(), self.meta_path()] {
            if path.exists() {
                fs::remove_file(&path)
                    .map_err(|e| TableError::CacheError(format!("remove failed: {e}")))?;
            }
        }
        Ok(())
    }
}
