//! # News Scrape
//!
//! Batch front end for the `news_scrape` library: extracts a record for every
//! URL given on the command line or in a URL-list file, then writes the
//! records as JSON.
//!
//! ## Usage
//!
//! ```sh
//! news_scrape https://example.com/a https://example.com/b
//! news_scrape -i urls.txt -j ./json -c config.yaml
//! ```

use clap::Parser;
use news_scrape::outputs::json;
use news_scrape::utils::ensure_writable_dir;
use news_scrape::{ExtractionBatch, Scraper, ScraperConfig};
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::{Cli, parse_url_list};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_scrape starting up");

    let args = Cli::parse();
    debug!(?args.json_output_dir, ?args.config, concurrency = args.concurrency, "Parsed CLI arguments");

    let config = match &args.config {
        Some(path) => {
            let config = ScraperConfig::load(path).await?;
            info!(config_path = %path, "Loaded configuration");
            config
        }
        None => ScraperConfig::default(),
    };

    let mut urls = args.urls.clone();
    if let Some(input) = &args.input {
        let contents = tokio::fs::read_to_string(input).await?;
        let listed = parse_url_list(&contents);
        info!(path = %input, count = listed.len(), "Read URL list");
        urls.extend(listed);
    }
    if urls.is_empty() {
        error!("No URLs given; pass them as arguments or with --input");
        return Err("no URLs to extract".into());
    }

    // Fail before fetching anything if the output can't be written
    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "JSON output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e.into());
        }
    }

    let scraper = Scraper::new(&config)?;
    let outcomes = scraper.extract_many(urls, args.concurrency).await;
    let batch = ExtractionBatch::from_outcomes(outcomes);
    info!(
        local_date = %batch.local_date,
        local_time = %batch.local_time,
        records = batch.records.len(),
        failures = batch.failures.len(),
        "Batch assembled"
    );

    match &args.json_output_dir {
        Some(dir) => {
            json::write_batch(&batch, dir).await?;
        }
        None => println!("{}", serde_json::to_string_pretty(&batch)?),
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
