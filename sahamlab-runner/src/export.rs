//! Leaderboard export — display CSV, JSON manifest, and Markdown report.
//!
//! The CSV export is the user-facing download: field names match the
//! displayed columns exactly, UTF-8, no index column, and the 2-decimal
//! presentation rounding already applied upstream. Exporting and
//! re-parsing a leaderboard reproduces every displayed value.
//!
//! All persisted JSON artifacts include a `schema_version` field; unknown
//! versions are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use sahamlab_core::domain::ScoreRow;
use sahamlab_core::screen::Leaderboard;

use crate::runner::{ScreenResult, SCHEMA_VERSION};

/// The displayed columns, in display order.
pub const DISPLAY_COLUMNS: [&str; 10] = [
    "Stock Code",
    "Company Name",
    "Sector",
    "Akumulasi Ratio",
    "Inflow Ratio",
    "Unusual Volume (5d)",
    "Avg Bid/Offer Imbalance",
    "Harga > VWAP (5d)",
    "Last Close Price",
    "Score",
];

// ─── JSON manifest ──────────────────────────────────────────────────

/// Serialize a `ScreenResult` to pretty JSON.
pub fn export_json(result: &ScreenResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize ScreenResult to JSON")
}

/// Deserialize a `ScreenResult` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<ScreenResult> {
    let result: ScreenResult =
        serde_json::from_str(json).context("failed to deserialize ScreenResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export one leaderboard (optionally sector-filtered) as display CSV.
pub fn export_leaderboard_csv(board: &Leaderboard, sector: Option<&str>) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(DISPLAY_COLUMNS)?;

    for row in board.filtered(sector) {
        wtr.write_record([
            row.stock_code.clone(),
            row.company_name.clone(),
            row.sector.clone(),
            format!("{:.2}", row.akumulasi_ratio),
            format!("{:.2}", row.inflow_ratio),
            row.unusual_volume_5d.to_string(),
            format!("{:.2}", row.avg_bid_offer),
            row.price_above_vwap_5d.to_string(),
            row.last_close.map(|c| c.to_string()).unwrap_or_default(),
            format!("{:.2}", row.score),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Re-parse an exported leaderboard CSV.
///
/// Round-trip contract: for every displayed column the parsed values
/// equal the exported ones (the 2-decimal rounding was already applied
/// before export, so nothing is lost here).
pub fn parse_leaderboard_csv(content: &str) -> Result<Vec<ScoreRow>> {
    let mut rdr = csv::Reader::from_reader(content.as_bytes());

    let headers = rdr.headers().context("missing CSV header")?.clone();
    let expected: Vec<&str> = DISPLAY_COLUMNS.to_vec();
    let actual: Vec<&str> = headers.iter().collect();
    if actual != expected {
        bail!("unexpected leaderboard columns: {actual:?}");
    }

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("bad CSV record at data row {}", i + 1))?;
        let field = |idx: usize| record.get(idx).unwrap_or("").to_string();
        let number = |idx: usize| -> Result<f64> {
            field(idx)
                .parse::<f64>()
                .with_context(|| format!("bad number in '{}' at data row {}", DISPLAY_COLUMNS[idx], i + 1))
        };
        let count = |idx: usize| -> Result<u32> {
            field(idx)
                .parse::<u32>()
                .with_context(|| format!("bad count in '{}' at data row {}", DISPLAY_COLUMNS[idx], i + 1))
        };

        let last_close = {
            let raw = field(8);
            if raw.is_empty() {
                None
            } else {
                Some(raw.parse::<f64>().with_context(|| {
                    format!("bad number in 'Last Close Price' at data row {}", i + 1)
                })?)
            }
        };

        rows.push(ScoreRow {
            stock_code: field(0),
            company_name: field(1),
            sector: field(2),
            akumulasi_ratio: number(3)?,
            inflow_ratio: number(4)?,
            unusual_volume_5d: count(5)?,
            avg_bid_offer: number(6)?,
            price_above_vwap_5d: count(7)?,
            last_close,
            score: number(9)?,
        });
    }
    Ok(rows)
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for one screen run.
///
/// Creates a directory named `screen_{timestamp}/` under `output_dir`
/// containing:
/// - `screen.json` — the full `ScreenResult`
/// - `top25_stock_picks_{days}d.csv` — one display CSV per window,
///   with the configured sector filter applied
///
/// Returns the path to the created directory.
pub fn save_artifacts(
    result: &ScreenResult,
    sector: Option<&str>,
    output_dir: &Path,
) -> Result<PathBuf> {
    let dirname = format!("screen_{}", chrono::Local::now().format("%Y%m%d_%H%M%S"));
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    let json = export_json(result)?;
    std::fs::write(run_dir.join("screen.json"), &json)?;

    for board in &result.leaderboards {
        let csv = export_leaderboard_csv(board, sector)?;
        std::fs::write(
            run_dir.join(format!("top25_stock_picks_{}d.csv", board.days)),
            &csv,
        )?;
    }

    Ok(run_dir)
}

/// Load a `ScreenResult` from an artifact directory's screen.json.
pub fn load_artifacts(dir: &Path) -> Result<ScreenResult> {
    let manifest_path = dir.join("screen.json");
    let json = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    import_json(&json)
}

// ─── Markdown report ────────────────────────────────────────────────

/// Generate a Markdown report covering every window's leaderboard.
pub fn generate_report(result: &ScreenResult, sector: Option<&str>) -> String {
    let mut md = String::with_capacity(4096);

    md.push_str("# Top Stock Picks Potensial\n\n");
    md.push_str(&format!("Anchor date: {}\n\n", result.anchor));
    md.push_str(&format!("Dataset hash: {}\n\n", result.dataset_hash));
    if let Some(s) = sector {
        md.push_str(&format!("Sector filter: {s}\n\n"));
    }
    if result.has_synthetic {
        md.push_str("**Data: SYNTHETIC**\n\n");
    }

    for board in &result.leaderboards {
        md.push_str(&format!("## Analisis {} Hari\n\n", board.days));

        let rows = board.filtered(sector);
        if rows.is_empty() {
            md.push_str("No qualifying stocks.\n\n");
            continue;
        }

        md.push_str("| # | Code | Company | Sector | Akum | Inflow | UV(5d) | Imb | >VWAP(5d) | Close | Score |\n");
        md.push_str("| ---: | --- | --- | --- | ---: | ---: | ---: | ---: | ---: | ---: | ---: |\n");
        for (i, row) in rows.iter().enumerate() {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {:.2} | {:.2} | {} | {:.2} | {} | {} | {:.2} |\n",
                i + 1,
                escape_cell(&row.stock_code),
                escape_cell(&row.company_name),
                escape_cell(&row.sector),
                row.akumulasi_ratio,
                row.inflow_ratio,
                row.unusual_volume_5d,
                row.avg_bid_offer,
                row.price_above_vwap_5d,
                row.last_close.map(|c| c.to_string()).unwrap_or_default(),
                row.score,
            ));
        }
        md.push('\n');
    }

    md
}

/// A literal `|` in a name would end the table cell early.
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}
