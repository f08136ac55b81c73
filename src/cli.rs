//! Command-line interface definitions for the scraper.
//!
//! This module defines the CLI arguments and options using the `clap` crate.

use crate::fetch::FetchPolicy;
use clap::Parser;
use std::time::Duration;

/// Command-line arguments for the scraper.
///
/// # Examples
///
/// ```sh
/// # Scrape every section, report named articles_<timestamp>.json
/// veille_scraper
///
/// # Named report in ./out, only two sections, faster retries
/// veille_scraper -t veille-mai -o ./out --source zataz-osint --source itconnect-deals --base-delay 0.5
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Report name (without extension)
    #[arg(short, long)]
    pub title: Option<String>,

    /// Output directory for the JSON report
    #[arg(short, long, default_value = ".")]
    pub output_dir: String,

    /// Attempts per request before a source is given up
    #[arg(long, default_value_t = 3)]
    pub max_attempts: u32,

    /// Base politeness/backoff delay in seconds
    #[arg(long, default_value_t = 2.0)]
    pub base_delay: f64,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Accept invalid TLS certificates
    #[arg(long)]
    pub insecure: bool,

    /// Only scrape these source ids (repeatable)
    #[arg(long = "source")]
    pub sources: Vec<String>,
}

impl Cli {
    /// The fetch policy described by the flags.
    pub fn fetch_policy(&self) -> FetchPolicy {
        FetchPolicy {
            max_attempts: self.max_attempts,
            base_delay: Duration::try_from_secs_f64(self.base_delay).unwrap_or_default(),
            timeout: Duration::from_secs(self.timeout),
            verify_tls: !self.insecure,
            ..FetchPolicy::default()
        }
    }
}
