use std::env;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use stormlab::config;
use stormlab::storm::{HURRICANE_FLOOR_MPH, Storm, StormModel};

#[derive(Serialize)]
struct CatalogEntry {
    year: u32,
    #[serde(flatten)]
    storm: Storm,
}

/// Sample a storm catalog from the canonical model and write it as NDJSON to
/// stdout, one storm per line, with a summary on stderr. Usage:
/// `storm_catalog [n_years] [seed]`.
fn main() {
    let params = config::canonical_params();

    let n_years: u32 = env::args().nth(1).and_then(|s| s.parse().ok()).unwrap_or(1_000);
    let seed: u64 = env::args().nth(2).and_then(|s| s.parse().ok()).unwrap_or(params.seed);

    let model = StormModel::new(
        params.lambda,
        params.wind_mean_mph,
        params.wind_std_mph,
        params.wind_floor_mph,
        params.genesis_box,
    )
    .unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut entries = Vec::new();
    for year in 1..=n_years {
        let n = model.storm_count(&mut rng);
        for _ in 0..n {
            entries.push(CatalogEntry { year, storm: model.sample_storm(&mut rng) });
        }
    }

    for entry in &entries {
        println!("{}", serde_json::to_string(entry).expect("serialisation failed"));
    }

    // Summary to stderr so the NDJSON stream stays clean.
    let n_storms = entries.len();
    eprintln!(
        "storm_catalog: {} years, {} storms (expected ~{:.0})",
        n_years,
        n_storms,
        params.lambda * n_years as f64
    );
    if n_storms > 0 {
        let mean_wind: f64 =
            entries.iter().map(|e| e.storm.wind_mph).sum::<f64>() / n_storms as f64;
        let floored =
            entries.iter().filter(|e| e.storm.wind_mph == HURRICANE_FLOOR_MPH).count();
        let max_wind =
            entries.iter().map(|e| e.storm.wind_mph).fold(f64::NEG_INFINITY, f64::max);
        eprintln!("  mean_wind={mean_wind:.1} mph  max_wind={max_wind:.1} mph");
        eprintln!(
            "  floored_at_{HURRICANE_FLOOR_MPH}mph: {} ({:.1}%)",
            floored,
            100.0 * floored as f64 / n_storms as f64
        );
    }
}
