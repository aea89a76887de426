//! Timestamp normalization for backend payloads.
//!
//! Backend events mix epoch seconds and epoch milliseconds. Everything is
//! normalized to `DateTime<Utc>` at ingestion and serialized back out as
//! epoch milliseconds.

use chrono::{DateTime, TimeZone, Utc};

/// Raw values below this magnitude are read as seconds, above as milliseconds.
/// `1e11` seconds is far past year 5000 while `1e11` ms is early 1973.
pub const SECONDS_THRESHOLD: f64 = 100_000_000_000.0;

/// Convert a raw epoch value of unknown unit. Returns `None` for values that
/// are not finite or fall outside chrono's representable range.
pub fn from_raw(raw: f64) -> Option<DateTime<Utc>> {
    if !raw.is_finite() {
        return None;
    }

    let millis = if raw.abs() < SECONDS_THRESHOLD {
        raw * 1000.0
    } else {
        raw
    };

    Utc.timestamp_millis_opt(millis.round() as i64).single()
}

/// Normalize an optional raw timestamp, substituting the current time when
/// it is missing or unusable.
pub fn normalize(raw: Option<f64>) -> DateTime<Utc> {
    raw.and_then(from_raw).unwrap_or_else(Utc::now)
}

/// Millisecond value used when deriving message ids.
pub fn id_stamp(timestamp: &DateTime<Utc>) -> i64 {
    timestamp.timestamp_millis()
}
