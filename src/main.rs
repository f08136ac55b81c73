//! # Veille Scraper
//!
//! Collects technology and security news from several French sites and
//! writes them, normalized into one record shape, to a JSON report consumed
//! by the HTML report renderer.
//!
//! ## Features
//!
//! - Scrapes ZATAZ (security, dark web, OSINT) and IT-Connect (courses,
//!   tutorials, news sections, deals)
//! - Resolves the OSINT page's WordPress embeds with a second fetch per article
//! - Retries every request with a politeness delay and linear backoff
//! - Isolates failures per item and per source: a broken site never aborts the run
//!
//! ## Usage
//!
//! ```sh
//! veille_scraper -t veille-du-jour -o ./reports
//! ```
//!
//! ## Architecture
//!
//! Data flows strictly forward, one source at a time:
//! 1. **Registry**: the static list of sections ([`registry::REGISTRY`])
//! 2. **Fetching**: one listing fetch per section ([`fetch::Fetcher`])
//! 3. **Parsing**: the section's [`scrapers::ParsingStrategy`], with
//!    [`resolver::IndirectResolver`] for embed-only listings
//! 4. **Aggregation**: per-section records concatenated in registry order
//! 5. **Output**: the JSON report

use clap::Parser;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregator;
mod cli;
mod error;
mod fetch;
mod models;
mod outputs;
mod registry;
mod resolver;
mod scrapers;
mod utils;

use aggregator::Aggregator;
use cli::Cli;
use fetch::{Fetcher, ReqwestTransport, TokioDelay};
use outputs::json;
use utils::{ensure_writable_dir, truncate_for_log};

#[tokio::main(flavor = "current_thread")]
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
    info!("veille_scraper starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let sources = registry::select(&args.sources).map_err(|unknown| {
        error!(source = %unknown, "Unknown source id");
        format!("unknown source id '{unknown}'")
    })?;

    let output_dir = Path::new(&args.output_dir);
    if let Err(e) = ensure_writable_dir(output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let policy = args.fetch_policy();
    let transport = ReqwestTransport::new()?;
    let fetcher = Fetcher::new(transport, TokioDelay);

    info!(sources = sources.len(), max_attempts = policy.max_attempts, "Scraping sources");
    let outcome = Aggregator::new(&fetcher, policy, &sources).run().await;

    for summary in &outcome.sources {
        match &summary.failure {
            Some(reason) => warn!(
                source = summary.id,
                reason = %truncate_for_log(reason, 300),
                "Source produced no records"
            ),
            None => info!(source = summary.id, category = summary.category, count = summary.count, "Source summary"),
        }
    }

    match json::write_report(&outcome.records, args.title.as_deref(), output_dir).await {
        Ok(path) => info!(path = %path.display(), records = outcome.records.len(), "Report written"),
        Err(e) => {
            error!(error = %e, "Failed to write report");
            return Err(e);
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        records = outcome.records.len(),
        failed_sources = outcome.failed_sources(),
        "Execution complete"
    );

    Ok(())
}
