//! Timestamp utilities

use chrono::{DateTime, SecondsFormat, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Format a timestamp the way the wire expects it: ISO-8601 with
/// millisecond precision and a `Z` suffix (`2026-08-07T12:34:56.789Z`).
pub fn iso_datetime(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Format just the calendar date (`2026-08-07`).
pub fn iso_date(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}
