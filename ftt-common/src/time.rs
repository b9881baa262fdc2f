//! Timestamp utilities

use chrono::{DateTime, Local, NaiveDateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current local wall-clock time without zone
///
/// Label dates are printed in kitchen-local time with no offset, so they are
/// compared against this rather than UTC.
pub fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Convert seconds to duration
pub fn secs_to_duration(secs: u64) -> std::time::Duration {
    std::time::Duration::from_secs(secs)
}
