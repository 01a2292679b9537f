use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDateTime;
use clap::Parser;

use site_finder::domain::clock::{FixedClock, SharedClock, SystemClock};
use site_finder::domain::recommender::Recommender;
use site_finder::domain::search::{DEFAULT_MAX_DISTANCE_MILES, DEFAULT_MAX_RESULTS, LatLng, SearchOptions};
use site_finder::domain::seed_store::FileSeedStore;
use site_finder::{load_facilities, logger};

/// Lists nearby testing sites with a recommended visit time for each.
#[derive(Debug, Parser)]
#[command(name = "site_finder", version)]
struct Args {
    /// JSON file with the sites table.
    #[arg(long)]
    sites: String,

    #[arg(long, default_value_t = 38.8977, allow_negative_numbers = true)]
    lat: f64,

    #[arg(long, default_value_t = -77.0365, allow_negative_numbers = true)]
    lng: f64,

    /// File holding the persisted user seed.
    #[arg(long, default_value = "user_seed.json")]
    seed_file: String,

    /// Evaluate as of this local time (YYYY-MM-DDTHH:MM:SS) instead of now.
    #[arg(long, value_parser = parse_now)]
    now: Option<NaiveDateTime>,

    #[arg(long, default_value_t = DEFAULT_MAX_RESULTS)]
    max_results: usize,

    #[arg(long, default_value_t = DEFAULT_MAX_DISTANCE_MILES)]
    max_distance_miles: f64,
}

fn parse_now(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").map_err(|e| format!("invalid --now '{}': {}", value, e))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init();

    let facilities = load_facilities(&args.sites).with_context(|| format!("loading sites table '{}'", args.sites))?;

    let clock: SharedClock = match args.now {
        Some(time) => Arc::new(FixedClock::new(time)),
        None => Arc::new(SystemClock),
    };
    let recommender = Recommender::new(FileSeedStore::new(&args.seed_file), clock);

    let options = SearchOptions { max_results: args.max_results, max_distance_miles: args.max_distance_miles };
    let results = recommender.search(&facilities, LatLng::new(args.lat, args.lng), options);

    println!("{}", serde_json::to_string_pretty(&results)?);

    Ok(())
}
