//! Date formatting for display
//!
//! Upstream dates come as compact `YYYYMMDD` strings, ISO dates, timestamps or
//! free text such as `"s.f."` (sine data). Everything parseable is rendered as
//! `DD/MM/YYYY`; anything else is handed back untouched.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Output pattern for every formatted date
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Format a raw date for display
///
/// An 8-character all-digit string is split positionally as `YYYYMMDD` with
/// no calendar validation. Other inputs go through a general parse; on failure
/// the input is returned unmodified.
pub fn format_date(raw: &str) -> String {
    let trimmed = raw.trim();

    if trimmed.len() == 8 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return format!("{}/{}/{}", &trimmed[6..8], &trimmed[4..6], &trimmed[0..4]);
    }

    parse_date(trimmed)
        .map(|date| date.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_compact() {
        assert_eq!(format_date("20240115"), "15/01/2024");
    }

    #[test]
    fn test_format_date_compact_is_positional() {
        // No calendar validation for the compact form
        assert_eq!(format_date("20241399"), "99/13/2024");
    }

    #[test]
    fn test_format_date_iso() {
        assert_eq!(format_date("2024-01-15"), "15/01/2024");
        assert_eq!(format_date("2024-01-15T10:30:00"), "15/01/2024");
        assert_eq!(format_date("2024-01-15T10:30:00Z"), "15/01/2024");
        assert_eq!(format_date("2024-01-15 08:00:00"), "15/01/2024");
    }

    #[test]
    fn test_format_date_already_display_format() {
        assert_eq!(format_date("15/01/2024"), "15/01/2024");
    }

    #[test]
    fn test_format_date_unparseable_returned_unchanged() {
        assert_eq!(format_date("s.f."), "s.f.");
        assert_eq!(format_date("2024"), "2024");
        assert_eq!(format_date("2024-02-30"), "2024-02-30");
        assert_eq!(format_date(""), "");
    }
}
