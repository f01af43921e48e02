use chrono::{Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Time
// =============================================================================

/// A point in time as Unix epoch seconds.
///
/// Compared by value. Two Timestamps with the same inner value are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp())
    }
}

/// Current time as Unix epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Format epoch milliseconds as a human-readable local date and time.
///
/// Falls back to the raw number when the value is out of chrono's range.
pub fn format_millis_local(epoch_ms: i64) -> String {
    Local
        .timestamp_millis_opt(epoch_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| epoch_ms.to_string())
}
