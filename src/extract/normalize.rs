//! Ordinal-suffix stripping applied before date pattern matching.
//!
//! Announcements write days as "1st", "22nd" or "31st". Removing the suffix
//! up front keeps the date shapes in [`crate::extract::patterns`] simple.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static ORDINAL_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})(st|nd|rd|th)").expect("ordinal suffix pattern is valid"));

/// Replace every `<1-2 digits><st|nd|rd|th>` with just the digits.
///
/// No other character is altered, so the output is never longer than the
/// input. Borrows the input unchanged when there is nothing to strip.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(strip_ordinals("31st August, 2024"), "31 August, 2024");
/// assert_eq!(strip_ordinals("no ordinals here"), "no ordinals here");
/// ```
pub fn strip_ordinals(text: &str) -> Cow<'_, str> {
    ORDINAL_SUFFIX.replace_all(text, "${1}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_every_ordinal_form() {
        assert_eq!(
            strip_ordinals("1st, 2nd, 3rd and 4th of the month"),
            "1, 2, 3 and 4 of the month"
        );
        assert_eq!(strip_ordinals("the 22nd and 31st"), "the 22 and 31");
    }

    #[test]
    fn test_ordinal_before_month_name() {
        let out = strip_ordinals("31st August, 2024");
        assert!(out.contains("31 August, 2024"));
    }

    #[test]
    fn test_leaves_other_text_alone() {
        let text = "Retirement of the Standard tier; first notice sent in August";
        assert_eq!(strip_ordinals(text), text);
        assert!(matches!(strip_ordinals(text), Cow::Borrowed(_)));
    }

    #[test]
    fn test_idempotent_on_normalized_text() {
        let once = strip_ordinals("Support ends on the 1st of March, 3rd party tools by 23rd May 2025")
            .into_owned();
        let twice = strip_ordinals(&once).into_owned();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(strip_ordinals(""), "");
    }
}
