//! Retirement date resolution with title-then-description fallback.

use crate::extract::patterns::find_date;
use crate::models::RetirementDate;

/// Resolve the retirement date for one announcement.
///
/// The title is searched first and wins whenever it holds a date. Only when
/// the title has none is the description searched. The entity recognizer is
/// never consulted here.
///
/// # Arguments
///
/// * `title` - The announcement headline
/// * `description` - The announcement body
///
/// # Returns
///
/// [`RetirementDate::Found`] with the matched (ordinal-stripped) text, or
/// [`RetirementDate::NotFound`] when neither field holds a date.
pub fn resolve_retirement_date(title: &str, description: &str) -> RetirementDate {
    find_date(title)
        .or_else(|| find_date(description))
        .map(|m| RetirementDate::Found(m.text))
        .unwrap_or(RetirementDate::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_takes_precedence() {
        let date = resolve_retirement_date(
            "Azure Classic Cloud Services retire on 31 August, 2024",
            "Migrate before 26/09/2025",
        );
        assert_eq!(date, RetirementDate::Found("31 August, 2024".to_string()));
    }

    #[test]
    fn test_falls_back_to_description() {
        let date = resolve_retirement_date(
            "Retirement: Basic Load Balancer",
            "Basic Load Balancer will be retired on 12/01/2027.",
        );
        assert_eq!(date, RetirementDate::Found("12/01/2027".to_string()));
    }

    #[test]
    fn test_neither_field_has_a_date() {
        let date = resolve_retirement_date("Service update", "Read the migration guide.");
        assert_eq!(date, RetirementDate::NotFound);
        assert_eq!(date.to_string(), "No date found");
    }

    #[test]
    fn test_end_to_end_ordinal_title() {
        let date =
            resolve_retirement_date("Retirement of Widget API on 1st January, 2026", "See docs.");
        assert_eq!(date.as_found(), Some("1 January, 2026"));
    }

    #[test]
    fn test_sentinel_text_in_title_is_not_a_date() {
        let date = resolve_retirement_date("No date found", "Ends March 2026");
        assert_eq!(date.as_found(), Some("March 2026"));
    }
}
