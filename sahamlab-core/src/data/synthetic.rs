//! Synthetic dataset generator for offline demos and tests.
//!
//! Produces a plausible multi-stock table over a fixed universe of IDX
//! names. Each stock's stream is seeded from its code, so the output is
//! deterministic run-to-run. Results built on this data are tagged as
//! synthetic in the run provenance.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::{AccumulationSignal, ForeignFlow, TradingRecord};

/// A small fixed universe of (code, company, sector) triples.
const UNIVERSE: [(&str, &str, &str); 20] = [
    ("BBCA", "Bank Central Asia", "Financials"),
    ("BBRI", "Bank Rakyat Indonesia", "Financials"),
    ("BMRI", "Bank Mandiri", "Financials"),
    ("BBNI", "Bank Negara Indonesia", "Financials"),
    ("TLKM", "Telkom Indonesia", "Infrastructure"),
    ("ASII", "Astra International", "Industrials"),
    ("UNVR", "Unilever Indonesia", "Consumer Non-Cyclicals"),
    ("ICBP", "Indofood CBP", "Consumer Non-Cyclicals"),
    ("INDF", "Indofood Sukses Makmur", "Consumer Non-Cyclicals"),
    ("GOTO", "GoTo Gojek Tokopedia", "Technology"),
    ("ANTM", "Aneka Tambang", "Basic Materials"),
    ("INCO", "Vale Indonesia", "Basic Materials"),
    ("MDKA", "Merdeka Copper Gold", "Basic Materials"),
    ("ADRO", "Adaro Energy", "Energy"),
    ("PTBA", "Bukit Asam", "Energy"),
    ("PGAS", "Perusahaan Gas Negara", "Energy"),
    ("KLBF", "Kalbe Farma", "Healthcare"),
    ("CPIN", "Charoen Pokphand Indonesia", "Consumer Non-Cyclicals"),
    ("EXCL", "XL Axiata", "Infrastructure"),
    ("SMGR", "Semen Indonesia", "Basic Materials"),
];

/// Generate a full synthetic table ending at `anchor`, covering
/// `history_days` of calendar lookback (weekends skipped).
pub fn generate_table(anchor: NaiveDate, history_days: i64) -> Vec<TradingRecord> {
    UNIVERSE
        .iter()
        .flat_map(|(code, name, sector)| generate_stock(code, name, sector, anchor, history_days))
        .collect()
}

fn generate_stock(
    code: &str,
    name: &str,
    sector: &str,
    anchor: NaiveDate,
    history_days: i64,
) -> Vec<TradingRecord> {
    // Deterministic seed per stock code.
    let seed: [u8; 32] = *blake3::hash(code.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut price = rng.gen_range(500.0..10_000.0_f64);
    let mut records = Vec::new();
    let mut current = anchor - Duration::days(history_days);

    while current <= anchor {
        if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            current += Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        price *= 1.0 + daily_return;
        let vwap = price * (1.0 + rng.gen_range(-0.01..0.01));

        let signal = match rng.gen_range(0..100u32) {
            0..=29 => AccumulationSignal::Akumulasi,
            30..=39 => AccumulationSignal::StrongAkumulasi,
            40..=59 => AccumulationSignal::Distribusi,
            60..=64 => AccumulationSignal::StrongDistribusi,
            _ => AccumulationSignal::Netral,
        };
        let foreign_flow = match rng.gen_range(0..100u32) {
            0..=39 => ForeignFlow::Inflow,
            40..=69 => ForeignFlow::Outflow,
            _ => ForeignFlow::Netral,
        };

        records.push(TradingRecord {
            stock_code: code.to_string(),
            company_name: name.to_string(),
            sector: sector.to_string(),
            date: current,
            close: price,
            vwap,
            signal,
            unusual_volume: rng.gen_bool(0.15),
            bid_offer_imbalance: rng.gen_range(-0.5..0.5),
            foreign_flow,
        });

        current += Duration::days(1);
    }

    records
}
