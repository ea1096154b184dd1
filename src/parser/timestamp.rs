//! Parsing of sample timestamps from detail views.

use crate::utils::config::TIMESTAMP_FORMATS;
use chrono::{DateTime, NaiveDateTime};

/// Parse a sample timestamp
///
/// Tries the EDP layouts first, then RFC 3339 (converted to naive UTC).
pub fn parse_timestamp(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(input)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_edp_layout() {
        let ts = parse_timestamp("08/05/2020 14:03:21.500").unwrap();
        let expected = NaiveDate::from_ymd_opt(2020, 8, 5)
            .unwrap()
            .and_hms_milli_opt(14, 3, 21, 500)
            .unwrap();
        assert_eq!(ts, expected);
    }

    #[test]
    fn test_iso_layouts() {
        assert!(parse_timestamp("2020-08-05 14:03:21").is_some());
        assert!(parse_timestamp("2020-08-05T14:03:21").is_some());
        assert!(parse_timestamp("2020-08-05T14:03:21+02:00").is_some());
    }

    #[test]
    fn test_garbage() {
        assert!(parse_timestamp("N/A").is_none());
        assert!(parse_timestamp("").is_none());
    }
}
