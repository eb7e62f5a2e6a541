//! Publication timestamp parsing for the retirement feed.
//!
//! The feed writes `pubDate` as `Mon, 14 Oct 2024 17:00:02 Z`. That trailing
//! `Z` is not a valid RFC 822 zone, so it is dropped and the remaining
//! timestamp is parsed as a naive local-less instant.

use crate::feeds::FeedError;
use chrono::NaiveDateTime;

/// Wire format of `pubDate` once the `" Z"` suffix is removed.
pub const PUBLISHED_FORMAT: &str = "%a, %d %b %Y %H:%M:%S";

/// [`PUBLISHED_FORMAT`] without its `Www, ` weekday prefix.
const PUBLISHED_DATE_FORMAT: &str = "%d %b %Y %H:%M:%S";

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Display format for publication dates in the report.
pub const PUB_DATE_DISPLAY_FORMAT: &str = "%d %B %Y";

/// Parse a feed publication timestamp.
///
/// Every literal `" Z"` is removed before parsing; the timezone is discarded,
/// never interpreted. The weekday must be a valid abbreviation but is not
/// checked against the date.
///
/// # Errors
///
/// Returns [`FeedError::Timestamp`] carrying the offending value when the
/// text does not match [`PUBLISHED_FORMAT`].
pub fn parse_published(raw: &str) -> Result<NaiveDateTime, FeedError> {
    let cleaned = raw.trim().replace(" Z", "");
    let parsed = match cleaned.split_once(", ") {
        Some((weekday, rest)) if WEEKDAYS.iter().any(|d| d.eq_ignore_ascii_case(weekday)) => {
            NaiveDateTime::parse_from_str(rest, PUBLISHED_DATE_FORMAT)
        }
        _ => NaiveDateTime::parse_from_str(&cleaned, PUBLISHED_FORMAT),
    };
    parsed.map_err(|source| FeedError::Timestamp {
        value: raw.to_string(),
        source,
    })
}

/// Format a publication instant as `DD MonthName YYYY`.
pub fn format_pub_date(published_at: &NaiveDateTime) -> String {
    published_at.format(PUB_DATE_DISPLAY_FORMAT).to_string()
}
