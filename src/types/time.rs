//! Timestamp parsing for provider payloads that are not strict RFC 3339.
//!
//! Kalshi and the odds aggregator send RFC 3339 and deserialize straight
//! into `DateTime<Utc>`. Gamma sends `"2025-09-05 00:20:00+00"` for game
//! start times and plain dates for some end dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Parse a timestamp into UTC.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` with or without an offset, and a
/// bare `YYYY-MM-DD` (taken as midnight UTC). Naive times are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%#z", "%Y-%m-%dT%H:%M:%S%#z"] {
        if let Ok(dt) = DateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_rfc3339_offsets_normalize() {
        let kickoff = utc("2025-09-05T00:20:00Z");
        assert_eq!(parse_timestamp("2025-09-05T00:20:00Z"), Some(kickoff));
        assert_eq!(parse_timestamp("2025-09-04T20:20:00-04:00"), Some(kickoff));
    }

    #[test]
    fn test_gamma_formats() {
        let kickoff = utc("2025-09-05T00:20:00Z");
        assert_eq!(parse_timestamp("2025-09-05 00:20:00+00"), Some(kickoff));
        assert_eq!(parse_timestamp("2025-09-05 00:20:00"), Some(kickoff));
        assert_eq!(
            parse_timestamp("2025-09-05"),
            Some(utc("2025-09-05T00:00:00Z"))
        );
    }

    #[test]
    fn test_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("next thursday"), None);
    }
}
