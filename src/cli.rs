//! Command-line interface definitions for the batch extractor.
//!
//! Every option except the URL list can also be supplied through an
//! environment variable.

use clap::Parser;

/// Command-line arguments for `news_scrape`.
///
/// # Examples
///
/// ```sh
/// # Print records for two URLs to stdout
/// news_scrape https://example.com/a https://example.com/b
///
/// # Read URLs from a file and write a dated JSON file
/// news_scrape -i urls.txt -j ./json --concurrency 8
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Article URLs to extract
    pub urls: Vec<String>,

    /// File with one URL per line (blank lines and `#` comments are skipped)
    #[arg(short, long)]
    pub input: Option<String>,

    /// Output directory for the JSON records file; records go to stdout when absent
    #[arg(short, long, env = "NEWS_SCRAPE_JSON_DIR")]
    pub json_output_dir: Option<String>,

    /// Optional path to config.yaml file
    #[arg(short, long, env = "NEWS_SCRAPE_CONFIG")]
    pub config: Option<String>,

    /// Number of URLs processed at once
    #[arg(long, env = "NEWS_SCRAPE_CONCURRENCY", default_value_t = 4)]
    pub concurrency: usize,
}

/// Collect URLs from a URL-list file's contents.
pub fn parse_url_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
