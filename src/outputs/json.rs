//! JSON output of the full report.
//!
//! Unlike the HTML and CSV outputs this one carries the diagnostic
//! `date_entities` of every row and the list of skipped entries.

use crate::models::Report;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Write `report` as pretty-printed JSON to `{output_dir}/{report_name}.json`.
///
/// # Returns
///
/// The path written, or an error if serialization or the write fails.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display()))]
pub async fn write_report(
    report: &Report,
    output_dir: &Path,
    report_name: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;
    let path = super::Format::Json.path_in(output_dir, report_name);

    fs::write(&path, json).await?;
    info!(path = %path.display(), rows = report.rows.len(), "Wrote JSON report");
    Ok(path)
}
