//! Parsing and display formatting for post dates. Frontmatter dates are
//! accepted as plain calendar dates (`2024-04-03`, taken as midnight), as
//! `2024-04-03 10:00:00`, or as RFC 3339 timestamps (kept in their own
//! offset's local time). The time of day orders posts; only the calendar date
//! is displayed.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Shown in place of a date when a post has none or it couldn't be parsed.
pub const DATE_UNKNOWN: &str = "date unknown";

/// Parses a frontmatter date. Returns [`None`] for anything unrecognized.
pub fn parse(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S")
    {
        return Some(datetime);
    }
    DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|datetime| datetime.naive_local())
}

/// Formats a post date, e.g. `April 03, 2024`.
pub fn long(datetime: NaiveDateTime) -> String {
    datetime.format("%B %d, %Y").to_string()
}

/// Formats an update date, e.g. `Apr 03, 2024`.
pub fn short(datetime: NaiveDateTime) -> String {
    datetime.format("%b %d, %Y").to_string()
}

/// Returns `formatted` or [`DATE_UNKNOWN`].
pub fn or_unknown(formatted: Option<&str>) -> &str {
    formatted.unwrap_or(DATE_UNKNOWN)
}
