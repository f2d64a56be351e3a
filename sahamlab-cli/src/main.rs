//! SahamLab CLI — fetch, screen, and cache management commands.
//!
//! Commands:
//! - `fetch` — download the source CSV and cache it locally
//! - `screen` — run the accumulation screen and export the leaderboards
//! - `cache status` — report what is cached and when it was fetched
//! - `cache clear` — drop the cached dataset

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use sahamlab_core::data::{CsvCache, HttpCsvProvider, LocalCsvProvider, TableProvider};
use sahamlab_core::screen::Leaderboard;
use sahamlab_runner::{
    generate_report, load_table, run_screen, save_artifacts, LoadOptions, ScreenConfig,
    ScreenResult, DEFAULT_SOURCE_URL,
};

#[derive(Parser)]
#[command(
    name = "sahamlab",
    about = "SahamLab CLI — IDX accumulation screener"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the source CSV and cache it locally.
    Fetch {
        /// Source URL. Defaults to the published combined-signals dataset.
        #[arg(long, default_value = DEFAULT_SOURCE_URL)]
        url: String,

        /// Force re-download even if cached.
        #[arg(long, default_value_t = false)]
        force: bool,

        /// Cache directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,
    },
    /// Run the accumulation screen and export the leaderboards.
    Screen {
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Source URL. Overrides the config.
        #[arg(long)]
        url: Option<String>,

        /// Read the table from a local CSV file instead of the network.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Lookback windows in days. Overrides the config.
        #[arg(long, value_delimiter = ',')]
        days: Option<Vec<i64>>,

        /// Leaderboard size per window. Overrides the config.
        #[arg(long)]
        top: Option<usize>,

        /// Restrict displayed/exported tables to one sector.
        #[arg(long)]
        sector: Option<String>,

        /// Offline mode: no network access.
        #[arg(long, default_value_t = false)]
        offline: bool,

        /// Use synthetic data as fallback.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Force re-download even if cached.
        #[arg(long, default_value_t = false)]
        force: bool,

        /// Cache directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,

        /// Output directory for the artifact bundle.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// Also print the Markdown report to stdout.
        #[arg(long, default_value_t = false)]
        report: bool,
    },
    /// Cache management commands.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Report what is cached and when it was fetched.
    Status {
        /// Cache directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,
    },
    /// Drop the cached dataset.
    Clear {
        /// Cache directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            url,
            force,
            cache_dir,
        } => run_fetch(&url, force, &cache_dir),
        Commands::Screen {
            config,
            url,
            csv,
            days,
            top,
            sector,
            offline,
            synthetic,
            force,
            cache_dir,
            output_dir,
            report,
        } => run_screen_cmd(ScreenArgs {
            config,
            url,
            csv,
            days,
            top,
            sector,
            offline,
            synthetic,
            force,
            cache_dir,
            output_dir,
            report,
        }),
        Commands::Cache { action } => match action {
            CacheAction::Status { cache_dir } => run_cache_status(&cache_dir),
            CacheAction::Clear { cache_dir } => run_cache_clear(&cache_dir),
        },
    }
}

fn run_fetch(url: &str, force: bool, cache_dir: &Path) -> Result<()> {
    let cache = CsvCache::new(cache_dir);
    if cache.is_populated() && !force {
        let meta = cache.meta()?;
        println!(
            "Already cached: {} rows from {} (fetched {}). Pass --force to re-download.",
            meta.row_count, meta.source_url, meta.cached_at
        );
        return Ok(());
    }

    let provider = HttpCsvProvider::new(url);
    println!("Fetching {url} ...");
    let fetched = provider.fetch().context("download failed")?;
    cache.write(&fetched.raw_csv, url, fetched.records.len())?;
    println!("Cached {} rows to {}", fetched.records.len(), cache_dir.display());
    Ok(())
}

struct ScreenArgs {
    config: Option<PathBuf>,
    url: Option<String>,
    csv: Option<PathBuf>,
    days: Option<Vec<i64>>,
    top: Option<usize>,
    sector: Option<String>,
    offline: bool,
    synthetic: bool,
    force: bool,
    cache_dir: PathBuf,
    output_dir: PathBuf,
    report: bool,
}

fn run_screen_cmd(args: ScreenArgs) -> Result<()> {
    if args.csv.is_some() && args.url.is_some() {
        bail!("--csv and --url are mutually exclusive");
    }

    let mut config = match &args.config {
        Some(path) => ScreenConfig::from_file(path)?,
        None => ScreenConfig::default(),
    };
    if let Some(url) = args.url {
        config.source_url = url;
    }
    if let Some(days) = args.days {
        config.day_ranges = days;
    }
    if let Some(top) = args.top {
        config.top_n = top;
    }
    if args.sector.is_some() {
        config.sector = args.sector;
    }
    config.validate()?;

    let cache = CsvCache::new(&args.cache_dir);
    // A local CSV is not a network source: it stays usable under --offline.
    let opts = LoadOptions {
        offline: args.offline && args.csv.is_none(),
        synthetic: args.synthetic,
        force: args.force || args.csv.is_some(),
    };

    let local_provider = args.csv.map(LocalCsvProvider::new);
    let http_provider;
    let provider: Option<&dyn TableProvider> = if let Some(local) = &local_provider {
        Some(local)
    } else if args.offline {
        None
    } else {
        http_provider = HttpCsvProvider::new(config.source_url.clone());
        Some(&http_provider)
    };

    let table = load_table(&cache, provider, &config.source_url, &opts)?;
    let result = run_screen(&table, &config);

    print_summary(&result, config.sector.as_deref());

    let run_dir = save_artifacts(&result, config.sector.as_deref(), &args.output_dir)?;
    println!("Artifacts saved to: {}", run_dir.display());

    if args.report {
        println!();
        println!("{}", generate_report(&result, config.sector.as_deref()));
    }

    Ok(())
}

fn run_cache_status(cache_dir: &Path) -> Result<()> {
    let cache = CsvCache::new(cache_dir);
    if !cache.is_populated() {
        println!("Cache is empty: {}", cache_dir.display());
        return Ok(());
    }

    let meta = cache.meta()?;
    println!("Cache: {}", cache_dir.display());
    println!("Source:  {}", meta.source_url);
    println!("Rows:    {}", meta.row_count);
    println!("Hash:    {}", meta.data_hash);
    println!("Fetched: {}", meta.cached_at);
    Ok(())
}

fn run_cache_clear(cache_dir: &Path) -> Result<()> {
    let cache = CsvCache::new(cache_dir);
    if !cache.is_populated() {
        println!("Cache is already empty: {}", cache_dir.display());
        return Ok(());
    }
    cache.clear()?;
    println!("Cache cleared: {}", cache_dir.display());
    Ok(())
}

fn print_summary(result: &ScreenResult, sector: Option<&str>) {
    println!();
    println!("=== Top Stock Picks Potensial ===");
    println!("Anchor date:  {}", result.anchor);
    println!("Dataset hash: {}", &result.dataset_hash[..16.min(result.dataset_hash.len())]);
    if let Some(s) = sector {
        println!("Sector:       {s}");
    }
    if result.has_synthetic {
        println!();
        println!("WARNING: Results based on SYNTHETIC data");
    }

    for board in &result.leaderboards {
        println!();
        println!("--- Analisis {} Hari ---", board.days);
        print_board(board, sector);
    }
    println!();
}

fn print_board(board: &Leaderboard, sector: Option<&str>) {
    let rows = board.filtered(sector);
    if rows.is_empty() {
        println!("(no qualifying stocks)");
        return;
    }

    println!(
        "{:>3} {:<6} {:<28} {:<16} {:>6} {:>7} {:>7} {:>6} {:>6} {:>10} {:>6}",
        "#", "Code", "Company", "Sector", "Akum", "Inflow", "UV(5d)", "Imb", ">VWAP", "Close", "Score"
    );
    for (i, row) in rows.iter().enumerate() {
        println!(
            "{:>3} {:<6} {:<28} {:<16} {:>6.2} {:>7.2} {:>7} {:>6.2} {:>6} {:>10} {:>6.2}",
            i + 1,
            row.stock_code,
            truncate(&row.company_name, 28),
            truncate(&row.sector, 16),
            row.akumulasi_ratio,
            row.inflow_ratio,
            row.unusual_volume_5d,
            row.avg_bid_offer,
            row.price_above_vwap_5d,
            row.last_close.map(|c| c.to_string()).unwrap_or_default(),
            row.score,
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
