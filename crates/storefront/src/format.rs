//! Display helpers shared by front ends.
//!
//! Prices format themselves through [`fruit_mall_core::Price`]'s `Display`.

use chrono::{NaiveDate, NaiveDateTime};

/// `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `YYYY-MM-DD` for a timestamp.
#[must_use]
pub fn format_datetime(at: NaiveDateTime) -> String {
    format_date(at.date())
}

/// Round a rating to one decimal place.
#[must_use]
pub fn round_rating(rating: f64) -> f64 {
    (rating * 10.0).round() / 10.0
}

/// A rating with exactly one decimal, e.g. `4.3`.
#[must_use]
pub fn format_rating(rating: f64) -> String {
    format!("{:.1}", round_rating(rating))
}

/// Keep the first `max` characters of `text`, marking the cut with `...`.
///
/// ```
/// use fruit_mall_storefront::format::truncate;
///
/// assert_eq!(truncate("Jeju tangerine", 4), "Jeju...");
/// assert_eq!(truncate("Fig", 4), "Fig");
/// ```
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(format_date(date), "2024-03-07");
        assert_eq!(
            format_datetime(date.and_hms_opt(23, 59, 1).unwrap()),
            "2024-03-07"
        );
    }

    #[test]
    fn test_ratings_round_to_one_decimal() {
        assert!((round_rating(4.26) - 4.3).abs() < f64::EPSILON);
        assert_eq!(format_rating(4.0), "4.0");
        assert_eq!(format_rating(3.333), "3.3");
    }

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("제주 감귤 선물세트", 5), "제주 감귤...");
        assert_eq!(truncate("", 3), "");
        assert_eq!(truncate("abc", 3), "abc");
    }
}
