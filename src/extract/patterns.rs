//! Ordered date-shape matching over announcement text.
//!
//! Five shapes are tried in a fixed priority order and the first shape that
//! matches anywhere in the text wins. Within a shape the leftmost match is
//! taken. This means "31 August, 2024" beats an earlier "March 2024" in the
//! same sentence, because day-month-year outranks month-year.

use crate::extract::normalize::strip_ordinals;
use crate::utils::truncate_for_log;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use tracing::debug;

const MONTHS: &str =
    "January|February|March|April|May|June|July|August|September|October|November|December";
const MONTH_ABBREVS: &str = "Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec";

fn compile(pattern: String) -> Regex {
    Regex::new(&pattern).expect("date shape pattern is valid")
}

static DAY_MONTH_YEAR: Lazy<Regex> = Lazy::new(|| {
    compile(format!(
        r"\b\d{{1,2}}(?:st|nd|rd|th)?\s(?:{MONTHS}),?\s\d{{4}}\b"
    ))
});
static MONTH_DAY_YEAR: Lazy<Regex> = Lazy::new(|| {
    compile(format!(
        r"\b(?:{MONTHS})\s\d{{1,2}}(?:st|nd|rd|th)?,?\s\d{{4}}\b"
    ))
});
static DAY_ABBREV_YEAR: Lazy<Regex> = Lazy::new(|| {
    compile(format!(r"\b\d{{1,2}}[-/](?:{MONTH_ABBREVS})[a-zA-Z]*[-/]\d{{4}}\b"))
});
static NUMERIC_DATE: Lazy<Regex> =
    Lazy::new(|| compile(r"\b\d{1,2}[-/]\d{1,2}[-/]\d{4}\b".to_string()));
static MONTH_YEAR: Lazy<Regex> = Lazy::new(|| compile(format!(r"\b(?:{MONTHS})\s\d{{4}}\b")));

/// A recognized date shape, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateShape {
    /// `31 August, 2024`
    DayMonthYear,
    /// `August 31, 2024`
    MonthDayYear,
    /// `30-Sep-2026`
    DayAbbrevYear,
    /// `26/09/2025`
    Numeric,
    /// `March 2025`
    MonthYear,
}

impl DateShape {
    /// All shapes in the order they are attempted.
    pub const ALL: [DateShape; 5] = [
        DateShape::DayMonthYear,
        DateShape::MonthDayYear,
        DateShape::DayAbbrevYear,
        DateShape::Numeric,
        DateShape::MonthYear,
    ];

    fn regex(self) -> &'static Regex {
        match self {
            DateShape::DayMonthYear => &*DAY_MONTH_YEAR,
            DateShape::MonthDayYear => &*MONTH_DAY_YEAR,
            DateShape::DayAbbrevYear => &*DAY_ABBREV_YEAR,
            DateShape::Numeric => &*NUMERIC_DATE,
            DateShape::MonthYear => &*MONTH_YEAR,
        }
    }

    /// Leftmost match of this shape in `text`, if any.
    pub fn find(self, text: &str) -> Option<&str> {
        self.regex().find(text).map(|m| m.as_str())
    }
}

impl fmt::Display for DateShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DateShape::DayMonthYear => "day-month-year",
            DateShape::MonthDayYear => "month-day-year",
            DateShape::DayAbbrevYear => "day-abbrev-year",
            DateShape::Numeric => "numeric",
            DateShape::MonthYear => "month-year",
        };
        f.write_str(name)
    }
}

/// A date found by [`find_date`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMatch {
    /// Which shape produced the match.
    pub shape: DateShape,
    /// The matched substring of the ordinal-stripped text.
    pub text: String,
}

/// Find the first date in `text` by shape priority.
///
/// Ordinal suffixes are stripped before matching, so the returned text is a
/// substring of the normalized input ("1st January, 2026" comes back as
/// "1 January, 2026").
///
/// # Returns
///
/// `Some(DateMatch)` for the highest-priority shape present, `None` when no
/// shape matches anywhere.
pub fn find_date(text: &str) -> Option<DateMatch> {
    let normalized = strip_ordinals(text);

    for shape in DateShape::ALL {
        if let Some(found) = shape.find(&normalized) {
            debug!(
                %shape,
                date = found,
                source_text = %truncate_for_log(&normalized, 300),
                "Date found"
            );
            return Some(DateMatch {
                shape,
                text: found.to_string(),
            });
        }
    }

    debug!(source_text = %truncate_for_log(&normalized, 300), "No date found in text");
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found(text: &str) -> Option<String> {
        find_date(text).map(|m| m.text)
    }

    #[test]
    fn test_each_shape_returned_verbatim() {
        assert_eq!(
            found("Retiring on 31 August, 2024 for all regions").as_deref(),
            Some("31 August, 2024")
        );
        assert_eq!(
            found("Support ends August 31, 2024.").as_deref(),
            Some("August 31, 2024")
        );
        assert_eq!(
            found("Basic SKU retires 30-Sep-2026").as_deref(),
            Some("30-Sep-2026")
        );
        assert_eq!(
            found("Migrate before 26/09/2025 to avoid disruption").as_deref(),
            Some("26/09/2025")
        );
        assert_eq!(found("Retiring in March 2025").as_deref(), Some("March 2025"));
    }

    #[test]
    fn test_shape_is_reported() {
        let m = find_date("retires 30/Sept/2026").unwrap();
        assert_eq!(m.shape, DateShape::DayAbbrevYear);
        assert_eq!(m.text, "30/Sept/2026");

        let m = find_date("by 1-2-2030").unwrap();
        assert_eq!(m.shape, DateShape::Numeric);
    }

    #[test]
    fn test_no_date() {
        assert_eq!(find_date("We are improving the portal experience"), None);
        assert_eq!(find_date(""), None);
        assert_eq!(find_date("Version 2024 of the SDK"), None);
    }

    #[test]
    fn test_ordinals_normalized_before_matching() {
        assert_eq!(
            found("Retirement of Widget API on 1st January, 2026").as_deref(),
            Some("1 January, 2026")
        );
        assert_eq!(
            found("Ends on August 22nd 2025").as_deref(),
            Some("August 22 2025")
        );
    }

    #[test]
    fn test_higher_priority_shape_wins_over_leftmost() {
        let text = "March 2024 update: classic VMs retire 31 August, 2024";
        let m = find_date(text).unwrap();
        assert_eq!(m.shape, DateShape::DayMonthYear);
        assert_eq!(m.text, "31 August, 2024");
    }

    #[test]
    fn test_leftmost_within_shape() {
        assert_eq!(
            found("between 1 May 2025 and 30 June 2025").as_deref(),
            Some("1 May 2025")
        );
    }

    #[test]
    fn test_month_names_are_case_sensitive() {
        assert_eq!(find_date("retiring in march 2025"), None);
        assert_eq!(find_date("31 AUGUST, 2024"), None);
    }

    #[test]
    fn test_requires_four_digit_year() {
        assert_eq!(find_date("on 26/09/25"), None);
        assert_eq!(found("on 26/09/25 or March 2026").as_deref(), Some("March 2026"));
    }

    #[test]
    fn test_shape_order_is_fixed() {
        assert_eq!(DateShape::ALL[0], DateShape::DayMonthYear);
        assert_eq!(DateShape::ALL[4], DateShape::MonthYear);
        assert_eq!(DateShape::MonthYear.to_string(), "month-year");
    }
}
