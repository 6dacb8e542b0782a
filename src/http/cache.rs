//! HTTP cache validators
//!
//! `ETag` generation, `Last-Modified` dates and the conditional request checks
//! built on them (`If-None-Match`, `If-Modified-Since`, `If-Range`).

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// `Cache-Control` value for responses that must never be stored
pub const NO_STORE: &str = "no-store";

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Generate a strong `ETag` from content
///
/// # Returns
/// Quoted `ETag` string, e.g., `"abc123def"`
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let v = hasher.finish();
    format!("\"{v:x}-{:x}\"", content.len())
}

/// Check a client `If-None-Match` header against the current `ETag`
///
/// Uses weak comparison: `W/"x"` matches `"x"`. Supports lists and `*`.
pub fn etag_matches_weak(if_none_match: &str, etag: &str) -> bool {
    let current = strip_weak(etag);
    if_none_match.split(',').map(str::trim).any(|candidate| {
        candidate == "*" || (!candidate.is_empty() && strip_weak(candidate) == current)
    })
}

/// Strong comparison used by `If-Range`: weak tags never match
fn etag_matches_strong(candidate: &str, etag: &str) -> bool {
    !candidate.starts_with("W/") && !etag.starts_with("W/") && candidate == etag
}

fn strip_weak(tag: &str) -> &str {
    tag.strip_prefix("W/").unwrap_or(tag)
}

/// Format a timestamp as an IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn format_http_date(time: &DateTime<Utc>) -> String {
    time.format(HTTP_DATE_FORMAT).to_string()
}

/// Parse an HTTP-date. Accepts IMF-fixdate and anything RFC 2822 shaped.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, HTTP_DATE_FORMAT) {
        return Some(Utc.from_utc_datetime(&naive));
    }
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// HTTP dates carry whole seconds only
fn truncate_to_seconds(time: &DateTime<Utc>) -> i64 {
    time.timestamp()
}

/// Returns true if the resource changed after the `If-Modified-Since` date.
///
/// Unparsable dates count as modified.
pub fn is_modified_since(modified: &DateTime<Utc>, if_modified_since: &str) -> bool {
    parse_http_date(if_modified_since)
        .map_or(true, |since| truncate_to_seconds(modified) > truncate_to_seconds(&since))
}

/// Decide whether a `Range` header may be honoured under `If-Range`.
///
/// Without `If-Range` the range always applies. An entity tag must match
/// strongly; a date must equal the last modification time exactly.
pub fn if_range_allows(
    if_range: Option<&str>,
    etag: &str,
    modified: Option<&DateTime<Utc>>,
) -> bool {
    let Some(value) = if_range.map(str::trim) else {
        return true;
    };

    if value.starts_with('"') || value.starts_with("W/") {
        return etag_matches_strong(value, etag);
    }

    match (parse_http_date(value), modified) {
        (Some(date), Some(modified)) => {
            truncate_to_seconds(&date) == truncate_to_seconds(modified)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_etag() {
        let etag = generate_etag(b"hello world");
        assert!(etag.starts_with('"'));
        assert!(etag.ends_with('"'));
        assert_eq!(etag, generate_etag(b"hello world"));
        assert_ne!(etag, generate_etag(b"hello worle"));
    }

    #[test]
    fn test_etag_matches_weak() {
        let etag = "\"abc123\"";
        assert!(etag_matches_weak("\"abc123\"", etag));
        assert!(etag_matches_weak("W/\"abc123\"", etag));
        assert!(etag_matches_weak("\"xyz\", \"abc123\"", etag));
        assert!(etag_matches_weak("*", etag));
        assert!(!etag_matches_weak("\"different\"", etag));
        assert!(!etag_matches_weak("", etag));
    }

    #[test]
    fn test_http_date_round_trip_precision() {
        let time = Utc.with_ymd_and_hms(1994, 11, 6, 8, 49, 37).unwrap();
        let formatted = format_http_date(&time);
        assert_eq!(formatted, "Sun, 06 Nov 1994 08:49:37 GMT");
        assert_eq!(parse_http_date(&formatted), Some(time));
        assert!(parse_http_date("yesterday").is_none());
    }

    #[test]
    fn test_is_modified_since() {
        let modified = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert!(!is_modified_since(&modified, "Wed, 01 May 2024 12:00:00 GMT"));
        assert!(!is_modified_since(&modified, "Thu, 02 May 2024 12:00:00 GMT"));
        assert!(is_modified_since(&modified, "Tue, 30 Apr 2024 12:00:00 GMT"));
        assert!(is_modified_since(&modified, "garbage"));
    }

    #[test]
    fn test_if_range_allows() {
        let modified = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let etag = "\"abc\"";

        assert!(if_range_allows(None, etag, Some(&modified)));
        assert!(if_range_allows(Some("\"abc\""), etag, Some(&modified)));
        assert!(!if_range_allows(Some("W/\"abc\""), etag, Some(&modified)));
        assert!(!if_range_allows(Some("\"old\""), etag, Some(&modified)));
        assert!(if_range_allows(
            Some("Wed, 01 May 2024 12:00:00 GMT"),
            etag,
            Some(&modified)
        ));
        assert!(!if_range_allows(
            Some("Wed, 01 May 2024 11:00:00 GMT"),
            etag,
            Some(&modified)
        ));
        assert!(!if_range_allows(Some("Wed, 01 May 2024 12:00:00 GMT"), etag, None));
    }
}
