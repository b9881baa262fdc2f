//! Lifecycle state classification
//!
//! Maps a label's dates and the current wall-clock time to a
//! [`LifecycleState`]. Rules, first match wins:
//!
//! 1. `Defrosted` label and `dates[0] <= now <= dates[1]` → Defrosting
//! 2. `now` after the last date's day (time forced to 23:59) → Expired
//! 3. otherwise → Fresh
//!
//! The classifier never fails. A date that does not parse makes the rule that
//! needs it evaluate to false.

use crate::models::{LifecycleState, ParsedLabel, DEFROSTED_LABEL_TYPE};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Label date-time format (`dd/mm/yy HH:MM`)
pub const LABEL_DATETIME_FORMAT: &str = "%d/%m/%y %H:%M";

/// Label date format (`dd/mm/yy`)
pub const LABEL_DATE_FORMAT: &str = "%d/%m/%y";

/// Classify a label at time `now`
pub fn classify(dates: &[String], label_type: &str, now: NaiveDateTime) -> LifecycleState {
    if label_type == DEFROSTED_LABEL_TYPE && is_defrosting(dates, now) {
        return LifecycleState::Defrosting;
    }

    if is_expired(dates, now) {
        return LifecycleState::Expired;
    }

    LifecycleState::Fresh
}

/// Classify a parsed label at time `now`
pub fn classify_label(label: &ParsedLabel, now: NaiveDateTime) -> LifecycleState {
    classify(&label.dates, &label.label_type, now)
}

fn is_defrosting(dates: &[String], now: NaiveDateTime) -> bool {
    let (Some(start), Some(ready)) = (dates.first(), dates.get(1)) else {
        return false;
    };

    match (parse_label_datetime(start), parse_label_datetime(ready)) {
        (Some(start), Some(ready)) => start <= now && now <= ready,
        _ => false,
    }
}

fn is_expired(dates: &[String], now: NaiveDateTime) -> bool {
    let Some(use_by) = dates.last().and_then(|d| parse_label_date(d)) else {
        return false;
    };

    let end_of_day = use_by.and_time(end_of_use_by_day());
    now > end_of_day
}

fn end_of_use_by_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN)
}

/// Parse a full label date-time, ignoring a trailing annotation such as `E.O.D`
pub fn parse_label_datetime(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(strip_annotation(raw), LABEL_DATETIME_FORMAT).ok()
}

/// Parse the calendar date of a label date string
///
/// Takes the first whitespace-separated token that is a `dd/mm/yy` date, so
/// `"03/01/24 E.O.D"` and `"03/01/24 14:00"` both give 3 Jan 2024.
pub fn parse_label_date(raw: &str) -> Option<NaiveDate> {
    strip_annotation(raw)
        .split_whitespace()
        .find_map(|token| NaiveDate::parse_from_str(token, LABEL_DATE_FORMAT).ok())
}

fn strip_annotation(raw: &str) -> &str {
    raw.trim().trim_end_matches(|c: char| !c.is_ascii_digit())
}
