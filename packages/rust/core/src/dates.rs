//! Free-form date parsing for sorting and display.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Parse `Month [Day,] Year` (e.g. `March 2024`, `jan 15, 2023`) or ISO `YYYY-MM-DD`.
///
/// Month names are case-insensitive and may be abbreviated to three letters.
/// A missing day defaults to the 1st. Returns `None` for anything else,
/// including impossible dates like `February 30, 2024`.
pub fn parse_sort_date(s: &str) -> Option<NaiveDate> {
    static MONTH_DAY_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)^([a-z]+)\.?\s+(?:(\d{1,2})(?:st|nd|rd|th)?,?\s+)?(\d{4})$")
            .expect("valid regex")
    });

    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }

    let caps = MONTH_DAY_YEAR_RE.captures(s)?;
    let month = month_number(&caps[1])?;
    let day = caps.get(2).map_or(Some(1), |d| d.as_str().parse().ok())?;
    let year = caps[3].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Sort key for a date string; unparsable dates sort earliest.
pub fn sort_key(s: &str) -> NaiveDate {
    parse_sort_date(s).unwrap_or(NaiveDate::MIN)
}

/// Long and short display forms for an ISO date: (`March 05, 2024`, `March 2024`).
///
/// Strings that aren't `YYYY-MM-DD` are returned unchanged in both positions.
pub fn format_display_date(s: &str) -> (String, String) {
    match NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
        Ok(date) => (
            date.format("%B %d, %Y").to_string(),
            date.format("%B %Y").to_string(),
        ),
        Err(_) => (s.to_string(), s.to_string()),
    }
}

fn month_number(name: &str) -> Option<u32> {
    let name = name.to_ascii_lowercase();
    if name.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|full| *full == name || (name.len() <= 4 && full.starts_with(&name)))
        .map(|idx| idx as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_year_defaults_to_first() {
        assert_eq!(parse_sort_date("March 2024"), Some(ymd(2024, 3, 1)));
    }

    #[test]
    fn month_day_year_with_and_without_comma() {
        assert_eq!(parse_sort_date("January 15, 2023"), Some(ymd(2023, 1, 15)));
        assert_eq!(parse_sort_date("january 15 2023"), Some(ymd(2023, 1, 15)));
        assert_eq!(parse_sort_date("Sept 3rd, 2021"), Some(ymd(2021, 9, 3)));
        assert_eq!(parse_sort_date("DEC. 2020"), Some(ymd(2020, 12, 1)));
    }

    #[test]
    fn iso_dates_are_accepted() {
        assert_eq!(parse_sort_date("2022-07-04"), Some(ymd(2022, 7, 4)));
    }

    #[test]
    fn garbage_is_none() {
        assert_eq!(parse_sort_date("not-a-date"), None);
        assert_eq!(parse_sort_date("Smarch 2024"), None);
        assert_eq!(parse_sort_date("February 30, 2024"), None);
        assert_eq!(parse_sort_date(""), None);
    }

    #[test]
    fn newest_first_with_unparsable_last() {
        let mut dates = vec!["not-a-date", "January 15, 2023", "March 2024"];
        dates.sort_by_key(|d| std::cmp::Reverse(sort_key(d)));
        assert_eq!(dates, vec!["March 2024", "January 15, 2023", "not-a-date"]);
    }

    #[test]
    fn display_forms() {
        assert_eq!(
            format_display_date("2024-03-05"),
            ("March 05, 2024".to_string(), "March 2024".to_string())
        );
        assert_eq!(
            format_display_date("Spring 2019"),
            ("Spring 2019".to_string(), "Spring 2019".to_string())
        );
    }
}
