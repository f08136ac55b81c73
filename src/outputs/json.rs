//! JSON hand-off to the report renderer.
//!
//! The aggregated records are written as one document:
//! ```text
//! { "title": "...", "generatedAt": "16/10/2026", "records": [ ... ] }
//! ```
//!
//! # File Naming
//!
//! With a title override the file is `{output_dir}/{title}.json`, otherwise
//! `{output_dir}/articles_{YYYYmmdd_HHMMSS}.json`.

use crate::models::ContentRecord;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Default report heading.
pub const DEFAULT_TITLE: &str = "Veille Technologique";

/// The document handed to the renderer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report<'a> {
    pub title: &'a str,
    /// Generation date as `dd/mm/YYYY`.
    pub generated_at: String,
    pub records: &'a [ContentRecord],
}

/// File name of a report generated at `now`.
pub fn report_filename(title: Option<&str>, now: DateTime<Local>) -> String {
    match title {
        Some(title) => format!("{title}.json"),
        None => format!("articles_{}.json", now.format("%Y%m%d_%H%M%S")),
    }
}

/// Write `records` to `output_dir` as a pretty-printed JSON report.
///
/// # Arguments
///
/// * `records` - The aggregated records, written in the given order.
/// * `title` - Report heading and file stem; [`DEFAULT_TITLE`] and a
///   timestamped file name are used when `None`.
/// * `output_dir` - Created if missing.
///
/// # Returns
///
/// The path of the written file.
///
/// # Errors
///
/// Serialization failures and any I/O error creating the directory or writing the file.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display(), count = records.len()))]
pub async fn write_report(
    records: &[ContentRecord],
    title: Option<&str>,
    output_dir: &Path,
) -> Result<PathBuf, Box<dyn Error>> {
    let now = Local::now();
    let report = Report {
        title: title.unwrap_or(DEFAULT_TITLE),
        generated_at: now.format("%d/%m/%Y").to_string(),
        records,
    };
    let json = serde_json::to_string_pretty(&report)?;

    if let Err(e) = fs::create_dir_all(output_dir).await {
        error!(error = %e, "Failed to create output dir");
        return Err(e.into());
    }

    let path = output_dir.join(report_filename(title, now));
    info!(path = %path.display(), "Writing JSON report");
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote JSON report");

    Ok(path)
}
