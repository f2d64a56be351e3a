//! SahamLab Core — domain types, data providers, and the screening pipeline.
//!
//! This crate contains the heart of the accumulation screener:
//! - Domain types (trading records, categorical signals, score rows)
//! - Window selection and per-stock aggregation
//! - The fixed-weight scorer and the top-N ranker
//! - Table parsing with strict validation, the HTTP/local providers,
//!   the raw-CSV cache, and the synthetic dataset generator

pub mod data;
pub mod domain;
pub mod screen;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything that crosses the rayon boundary in
    /// the runner must be Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::TradingRecord>();
        require_sync::<domain::TradingRecord>();
        require_send::<domain::ScoreRow>();
        require_sync::<domain::ScoreRow>();
        require_send::<domain::AccumulationSignal>();
        require_sync::<domain::AccumulationSignal>();
        require_send::<domain::ForeignFlow>();
        require_sync::<domain::ForeignFlow>();

        require_send::<screen::AnalysisWindow>();
        require_sync::<screen::AnalysisWindow>();
        require_send::<screen::Leaderboard>();
        require_sync::<screen::Leaderboard>();
        require_send::<screen::WindowSignals>();
        require_sync::<screen::WindowSignals>();

        require_send::<data::FetchedTable>();
        require_sync::<data::FetchedTable>();
        require_send::<data::TableError>();
        require_sync::<data::TableError>();
    }
}
