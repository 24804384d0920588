use crate::blocks::element_text;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Raw value of the first configured tag present in `text`.
///
/// Tags are tried in order; the first tag name that occurs wins, and within
/// it the first occurrence.
pub fn extract_embedded(text: &str, tags: &[String]) -> Option<String> {
    tags.iter().find_map(|tag| element_text(text, tag))
}

/// Parse an embedded timestamp value.
///
/// Accepts RFC 3339, a naive ISO 8601 date-time (read as UTC, optional
/// fractional seconds) and a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
