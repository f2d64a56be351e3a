//! Serializable screen configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default source: the published combined-signals dataset.
pub const DEFAULT_SOURCE_URL: &str =
    "https://storage.googleapis.com/stock-csvku/hasil_gabungan.csv";

/// Errors from loading or validating a screen configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for one screen run.
///
/// Captures everything needed to reproduce a run against the same
/// dataset: source URL, window lengths, leaderboard size, and the
/// optional sector restriction applied to the displayed/exported tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// URL of the source CSV.
    pub source_url: String,

    /// Lookback lengths in days, one leaderboard each.
    pub day_ranges: Vec<i64>,

    /// Leaderboard size per window.
    pub top_n: usize,

    /// Optional sector filter applied after ranking.
    pub sector: Option<String>,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            day_ranges: sahamlab_core::screen::DAY_RANGES.to_vec(),
            top_n: sahamlab_core::screen::TOP_N,
            sector: None,
        }
    }
}

impl ScreenConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.day_ranges.is_empty() {
            return Err(ConfigError::Invalid("day_ranges must not be empty".into()));
        }
        if self.day_ranges.iter().any(|&d| d <= 0) {
            return Err(ConfigError::Invalid(
                "day_ranges must all be positive".into(),
            ));
        }
        if self.top_n == 0 {
            return Err(ConfigError::Invalid("top_n must be at least 1".into()));
        }
        Ok(())
    }

    /// Deterministic content hash of this configuration.
    ///
    /// Two runs with identical configs over the same dataset hash are
    /// reproductions of each other.
    pub fn screen_id(&self) -> String {
        let json = serde_json::to_string(self).expect("ScreenConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
