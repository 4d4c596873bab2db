//! Lenient date/time parsing for free-text values.
//!
//! Parsing never fails loudly: every entry point returns `None` for text that matches none of the
//! known layouts.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

/// Parse a calendar date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Parse a date-time. Plain dates are accepted and mapped to midnight; RFC 3339 offsets are
/// normalized to UTC.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| parse_date(s).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

#[cfg(test)]
mod tests {
    use super::{parse_date, parse_datetime};
    use chrono::NaiveDate;

    #[test]
    fn parses_common_layouts() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        for s in ["2024-03-09", "2024/03/09", "03/09/2024", "09.03.2024", "9 March 2024", "Mar 9, 2024"] {
            assert_eq!(parse_date(s), Some(d), "{s}");
        }

        let dt = d.and_hms_opt(14, 5, 0).unwrap();
        assert_eq!(parse_datetime("2024-03-09 14:05:00"), Some(dt));
        assert_eq!(parse_datetime("2024-03-09T14:05"), Some(dt));
        assert_eq!(parse_datetime("2024-03-09T16:05:00+02:00"), Some(dt));
        assert_eq!(parse_datetime(" 2024-03-09 "), d.and_hms_opt(0, 0, 0));
    }

    #[test]
    fn rejects_non_dates() {
        for s in ["", "hello", "42", "2024-13-01", "12.5", "N/A"] {
            assert_eq!(parse_datetime(s), None, "{s}");
        }
    }
}
