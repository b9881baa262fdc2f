//! Label data model
//!
//! A [`ParsedLabel`] is what the recognition service read off a physical
//! prep label. The meaning of each `dates` index depends on `label_type`:
//!
//! | label_type  | dates[0]      | dates[1]      | dates[2] |
//! |-------------|---------------|---------------|----------|
//! | `Defrosted` | defrost start | ready to prep | use by   |
//! | anything else | prepped     | use by        | -        |

use serde::{Deserialize, Serialize};
use std::fmt;

/// `label_type` value marking a defrost label
pub const DEFROSTED_LABEL_TYPE: &str = "Defrosted";

/// A label as read by the recognition service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedLabel {
    pub label_id: String,
    pub product_name: String,
    pub batch_no: String,
    pub employee_name: String,
    pub label_type: String,
    /// Date-time strings in `dd/mm/yy HH:MM` form, order is semantic
    pub dates: Vec<String>,
}

impl ParsedLabel {
    /// True for defrost labels (three dates: defrost, ready, use-by)
    pub fn is_defrosted(&self) -> bool {
        self.label_type == DEFROSTED_LABEL_TYPE
    }

    /// Date string at `index`, if present
    pub fn date(&self, index: usize) -> Option<&str> {
        self.dates.get(index).map(String::as_str)
    }
}

/// Canonical deduplication key of a label
///
/// Built by [`crate::services::key_generator::dedup_key`]; the inner string is
/// `product_name|dates[0]|dates[1]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DedupKey(String);

impl DedupKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A pending label held by the label store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelEntry {
    pub key: DedupKey,
    pub label: ParsedLabel,
}

/// Temporal state of a label
///
/// Always derived from the label's dates and the current time, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleState {
    /// Within its use-by window
    Fresh,
    /// Defrost label whose defrost window contains "now"
    Defrosting,
    /// Past the end of its use-by day
    Expired,
}
