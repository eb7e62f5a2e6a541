//! Data models for feed entries and their enriched representations.
//!
//! This module defines the core data structures used throughout the application:
//! - [`FeedEntry`]: Raw announcement as read from the feed
//! - [`RetirementDate`]: The extracted retirement date, or its absence
//! - [`RetirementRecord`]: An entry after timestamp parsing and date extraction
//! - [`Report`] and [`ReportRow`]: What the renderers consume
//!
//! The `"No date found"` label only appears when a [`RetirementDate`] is
//! displayed. Internally absence is always [`RetirementDate::NotFound`].

use crate::feeds::published::format_pub_date;
use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use std::fmt;

/// A raw announcement as read from the feed.
///
/// Missing elements in the feed item become empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    /// The announcement headline.
    pub title: String,
    /// The announcement body.
    pub description: String,
    /// The announcement's canonical URL.
    pub link: String,
    /// Publication timestamp in the feed's wire format.
    pub published: String,
}

/// The retirement date extracted from an announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetirementDate {
    /// A date substring found in the title or description.
    Found(String),
    /// Neither the title nor the description held a date.
    NotFound,
}

impl RetirementDate {
    /// Display label for [`RetirementDate::NotFound`].
    pub const NOT_FOUND_LABEL: &'static str = "No date found";

    /// The date text, if one was found.
    pub fn as_found(&self) -> Option<&str> {
        match self {
            RetirementDate::Found(date) => Some(date),
            RetirementDate::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, RetirementDate::Found(_))
    }
}

impl fmt::Display for RetirementDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_found().unwrap_or(Self::NOT_FOUND_LABEL))
    }
}

impl Serialize for RetirementDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A feed entry enriched with its parsed timestamp and retirement date.
///
/// Built once per entry and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetirementRecord {
    pub title: String,
    pub description: String,
    pub link: String,
    /// Publication instant. The feed's timezone suffix is discarded.
    pub published_at: NaiveDateTime,
    /// Authoritative retirement date.
    pub retirement_date: RetirementDate,
    /// Date spans tagged by the entity recognizer, `None` when that pass is
    /// disabled. Diagnostic only.
    pub date_entities: Option<Vec<String>>,
}

/// An entry left out of the report because its timestamp could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub title: String,
    pub link: String,
    pub reason: String,
}

/// One report row, with every field in display form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub title: String,
    pub link: String,
    pub description: String,
    /// Publication date as `DD MonthName YYYY`.
    pub pub_date: String,
    pub retirement_date: RetirementDate,
    /// Diagnostic entity-recognizer output; not used to pick `retirement_date`.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_date_entities"
    )]
    pub date_entities: Option<Vec<String>>,
}

/// An entity pass that tagged nothing is written as `["No date found"]`.
fn serialize_date_entities<S: Serializer>(
    entities: &Option<Vec<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match entities.as_deref() {
        Some([]) => serializer.collect_seq([RetirementDate::NOT_FOUND_LABEL]),
        Some(dates) => serializer.collect_seq(dates),
        None => serializer.serialize_none(),
    }
}

impl From<&RetirementRecord> for ReportRow {
    fn from(record: &RetirementRecord) -> Self {
        Self {
            title: record.title.clone(),
            link: record.link.clone(),
            description: record.description.clone(),
            pub_date: format_pub_date(&record.published_at),
            retirement_date: record.retirement_date.clone(),
            date_entities: record.date_entities.clone(),
        }
    }
}

/// Everything one run produces. Each execution builds exactly one `Report`.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Page heading, e.g. "Azure Service Retirements".
    pub title: String,
    /// Where the entries came from (URL or file path).
    pub feed_source: String,
    /// Generation time in RFC 3339.
    pub generated_at: String,
    pub rows: Vec<ReportRow>,
    pub skipped: Vec<SkippedEntry>,
}

impl Report {
    pub fn new(
        title: impl Into<String>,
        feed_source: impl Into<String>,
        generated_at: impl Into<String>,
        records: &[RetirementRecord],
        skipped: Vec<SkippedEntry>,
    ) -> Self {
        Self {
            title: title.into(),
            feed_source: feed_source.into(),
            generated_at: generated_at.into(),
            rows: records.iter().map(ReportRow::from).collect(),
            skipped,
        }
    }

    /// Number of rows with a retirement date.
    pub fn dated_count(&self) -> usize {
        self.rows.iter().filter(|r| r.retirement_date.is_found()).count()
    }
}
