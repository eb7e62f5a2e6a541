//! Turning raw feed entries into retirement records.
//!
//! Each entry is handled on its own: its timestamp is parsed, its retirement
//! date resolved, and (if a recognizer is supplied) its date entities
//! collected for diagnostics. An entry whose timestamp cannot be parsed is
//! skipped and reported; date extraction itself never fails.

use crate::extract::{EntityRecognizer, extract_date_entities, resolve_retirement_date};
use crate::feeds::published::parse_published;
use crate::models::{FeedEntry, RetirementDate, RetirementRecord, SkippedEntry};
use itertools::Itertools;
use tracing::{debug, info, instrument, warn};

/// The outcome of enriching one feed snapshot.
#[derive(Debug, Default)]
pub struct Batch {
    /// Enriched records, in feed order.
    pub records: Vec<RetirementRecord>,
    /// Entries left out because their publication timestamp was unusable.
    pub skipped: Vec<SkippedEntry>,
}

impl Batch {
    pub fn dated_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.retirement_date.is_found())
            .count()
    }
}

/// Drop entries whose link already appeared earlier in the feed.
///
/// Entries with an empty link are always kept.
pub fn dedupe_by_link(entries: Vec<FeedEntry>) -> Vec<FeedEntry> {
    let before = entries.len();
    let (linked, unlinked): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .enumerate()
        .partition(|(_, e)| !e.link.is_empty());

    let kept: Vec<FeedEntry> = linked
        .into_iter()
        .unique_by(|(_, e)| e.link.clone())
        .chain(unlinked)
        .sorted_by_key(|(i, _)| *i)
        .map(|(_, e)| e)
        .collect();

    if kept.len() != before {
        info!(removed = before - kept.len(), "Removed duplicate feed entries");
    }
    kept
}

/// Enrich one entry.
///
/// # Errors
///
/// Returns a [`SkippedEntry`] when the publication timestamp does not parse.
pub fn enrich_entry(
    entry: FeedEntry,
    recognizer: Option<&dyn EntityRecognizer>,
) -> Result<RetirementRecord, SkippedEntry> {
    let published_at = match parse_published(&entry.published) {
        Ok(dt) => dt,
        Err(e) => {
            warn!(
                title = %entry.title,
                value = %entry.published,
                error = %e,
                "Skipping entry with unparseable publication timestamp"
            );
            return Err(SkippedEntry {
                title: entry.title,
                link: entry.link,
                reason: e.to_string(),
            });
        }
    };

    let retirement_date = resolve_retirement_date(&entry.title, &entry.description);

    let date_entities = recognizer.map(|recognizer| {
        let mut dates = extract_date_entities(recognizer, &entry.title);
        dates.extend(extract_date_entities(recognizer, &entry.description));
        if dates.is_empty() {
            debug!(title = %entry.title, "Entity pass: {}", RetirementDate::NOT_FOUND_LABEL);
        }
        dates
    });

    debug!(title = %entry.title, %retirement_date, ?date_entities, "Enriched entry");

    Ok(RetirementRecord {
        title: entry.title,
        description: entry.description,
        link: entry.link,
        published_at,
        retirement_date,
        date_entities,
    })
}

/// Enrich every entry of a snapshot, keeping feed order.
#[instrument(level = "info", skip_all, fields(entries = entries.len()))]
pub fn enrich_entries(
    entries: Vec<FeedEntry>,
    recognizer: Option<&dyn EntityRecognizer>,
) -> Batch {
    let mut batch = Batch::default();
    for entry in entries {
        match enrich_entry(entry, recognizer) {
            Ok(record) => batch.records.push(record),
            Err(skipped) => batch.skipped.push(skipped),
        }
    }

    info!(
        records = batch.records.len(),
        dated = batch.dated_count(),
        undated = batch.records.len() - batch.dated_count(),
        skipped = batch.skipped.len(),
        "Extracted retirement dates"
    );
    batch
}
