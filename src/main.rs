//! # Retirement Feed Report
//!
//! Reads a cloud service-retirement RSS feed, pulls a retirement date out of
//! each announcement's title or description, and writes a searchable static
//! report.
//!
//! ## Usage
//!
//! ```sh
//! retirement_feed_report -o ./report -f html -f csv
//! ```
//!
//! ## Architecture
//!
//! One run, one snapshot:
//! 1. **Settings**: CLI flags over an optional YAML file over defaults
//! 2. **Model**: Load the lexicon model for the diagnostic entity pass (fatal on failure)
//! 3. **Fetching**: Read the feed over HTTP (timeout + backoff) or from a saved file
//! 4. **Extraction**: Parse timestamps, resolve retirement dates, collect entity spans
//! 5. **Output**: Write the HTML page and any CSV / JSON exports

use chrono::{SecondsFormat, Utc};
use clap::Parser;
use itertools::Itertools;
use std::error::Error;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::{EnvFilter, fmt as tfmt, prelude::*};

mod cli;
mod config;
mod extract;
mod feeds;
mod models;
mod outputs;
mod pipeline;
mod utils;

use cli::Cli;
use config::{NerSettings, Settings};
use extract::entities::ModelError;
use extract::{EntityRecognizer, LexiconModel};
use feeds::http::HttpFeed;
use feeds::retry::Retry;
use feeds::{FeedSource, FileFeed};
use models::{FeedEntry, Report};
use outputs::{Format, csv, html, json};
use pipeline::{dedupe_by_link, enrich_entries};
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();
    init_tracing(args.log_file.as_deref())?;

    let start_time = Instant::now();
    info!(version = env!("CARGO_PKG_VERSION"), "retirement_feed_report starting up");

    let settings = Settings::resolve(&args).inspect_err(|e| {
        error!(error = %e, "Invalid configuration");
    })?;

    // ---- Entity model (fatal before any record is touched) ----
    let model = if settings.ner.enabled {
        Some(load_model(&settings.ner).inspect_err(|e| {
            error!(error = %e, "Failed to load entity model");
        })?)
    } else {
        info!("Entity pass disabled");
        None
    };

    // Early check: ensure output dir is writable
    if let Err(e) = ensure_writable_dir(&settings.output_dir).await {
        error!(
            path = %settings.output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // ---- Fetch ----
    let entries = fetch_entries(&settings).await.inspect_err(|e| {
        error!(source = %settings.feed_source_label(), error = %e, "Failed to read feed");
    })?;
    info!(count = entries.len(), source = %settings.feed_source_label(), "Feed entries to analyze");

    let entries = if settings.dedupe_by_link {
        dedupe_by_link(entries)
    } else {
        entries
    };

    // ---- Extract ----
    let recognizer = model.as_ref().map(|m| m as &dyn EntityRecognizer);
    let batch = enrich_entries(entries, recognizer);

    let report = Report::new(
        settings.report_title.clone(),
        settings.feed_source_label(),
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        &batch.records,
        batch.skipped,
    );

    // ---- Output ----
    let mut failed = Vec::new();
    for format in settings.formats.iter().copied().unique() {
        let res = write_format(format, &report, &settings.output_dir, &settings.report_name).await;
        if let Err(e) = res {
            error!(%format, error = %e, "Failed to write report");
            failed.push(format);
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        rows = report.rows.len(),
        dated = report.dated_count(),
        skipped = report.skipped.len(),
        "Execution complete"
    );

    if !failed.is_empty() {
        let names = failed.iter().join(", ");
        return Err(format!("failed to write report format(s): {names}").into());
    }
    Ok(())
}

/// Console logging, plus an ANSI-free copy of every event in `log_file`.
fn init_tracing(log_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console = tfmt::layer()
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(UtcTime::rfc_3339());

    let file = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                tfmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_timer(UtcTime::rfc_3339())
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .init();
    Ok(())
}

fn load_model(ner: &NerSettings) -> Result<LexiconModel, ModelError> {
    let model = match &ner.model {
        Some(path) => LexiconModel::from_path(path)?,
        None => LexiconModel::builtin()?,
    };
    info!(model = model.name(), patterns = model.pattern_count(), "Loaded entity model");
    Ok(model)
}

async fn fetch_entries(settings: &Settings) -> Result<Vec<FeedEntry>, Box<dyn Error>> {
    let entries = match &settings.feed_file {
        Some(path) => FileFeed::new(path).entries().await?,
        None => {
            let feed = Retry::new(
                HttpFeed::new(settings.feed_url()?, settings.fetch.timeout())?,
                settings.fetch.max_retries,
                settings.fetch.base_delay(),
            );
            feed.entries().await?
        }
    };

    if entries.is_empty() {
        warn!("Feed has no entries; the report will be empty");
    }
    Ok(entries)
}

async fn write_format(
    format: Format,
    report: &Report,
    output_dir: &Path,
    report_name: &str,
) -> Result<(), Box<dyn Error>> {
    match format {
        Format::Html => html::write_report(report, output_dir, report_name).await?,
        Format::Csv => csv::write_report(report, output_dir, report_name).await?,
        Format::Json => json::write_report(report, output_dir, report_name).await?,
    };
    Ok(())
}
