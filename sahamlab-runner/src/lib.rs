//! SahamLab Runner — screen orchestration on top of `sahamlab-core`.
//!
//! This crate provides:
//! - Data loading with cache/download/synthetic fallback
//! - The multi-window screen runner (30/60/90 in parallel)
//! - Leaderboard export: display CSV, JSON manifest, Markdown report
//! - TOML screen configuration

pub mod config;
pub mod data_loader;
pub mod export;
pub mod runner;

pub use config::{ConfigError, ScreenConfig, DEFAULT_SOURCE_URL};
pub use data_loader::{load_table, LoadError, LoadOptions, LoadedTable};
pub use export::{
    export_json, export_leaderboard_csv, generate_report, import_json, load_artifacts,
    parse_leaderboard_csv, save_artifacts, DISPLAY_COLUMNS,
};
pub use runner::{run_screen, ScreenResult, SCHEMA_VERSION};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn loaded_table_is_send_sync() {
        assert_send::<LoadedTable>();
        assert_sync::<LoadedTable>();
    }

    #[test]
    fn screen_result_is_send_sync() {
        assert_send::<ScreenResult>();
        assert_sync::<ScreenResult>();
    }

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<ScreenConfig>();
        assert_sync::<ScreenConfig>();
        assert_send::<LoadOptions>();
        assert_sync::<LoadOptions>();
    }
}
