//! The screen runner — one leaderboard per configured window.
//!
//! Each window pass is a pure function of the shared immutable table and
//! the anchor date, so the passes run in parallel via rayon. Output order
//! is by window length regardless of scheduling.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use sahamlab_core::data::TableSource;
use sahamlab_core::screen::{screen, Leaderboard};

use crate::config::ScreenConfig;
use crate::data_loader::LoadedTable;

/// Version tag for persisted `ScreenResult` artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// The complete outcome of one screen run: every window's leaderboard
/// plus provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenResult {
    pub schema_version: u32,
    pub screen_id: String,
    pub anchor: NaiveDate,
    pub dataset_hash: String,
    pub source: TableSource,
    pub has_synthetic: bool,
    pub leaderboards: Vec<Leaderboard>,
}

impl ScreenResult {
    /// The leaderboard for a given window length, if it was configured.
    pub fn leaderboard(&self, days: i64) -> Option<&Leaderboard> {
        self.leaderboards.iter().find(|b| b.days == days)
    }
}

/// Run every configured window pass over the loaded table.
pub fn run_screen(table: &LoadedTable, config: &ScreenConfig) -> ScreenResult {
    let mut leaderboards: Vec<Leaderboard> = config
        .day_ranges
        .par_iter()
        .map(|&days| screen(&table.records, table.anchor, days, config.top_n))
        .collect();
    leaderboards.sort_by_key(|b| b.days);

    ScreenResult {
        schema_version: SCHEMA_VERSION,
        screen_id: config.screen_id(),
        anchor: table.anchor,
        dataset_hash: table.dataset_hash.clone(),
        source: table.source,
        has_synthetic: table.has_synthetic,
        leaderboards,
    }
}
