//! Deduplication key derivation
//!
//! Two labels are "the same label" when their product name and first two
//! dates agree. Batch number, employee and label id are ignored on purpose:
//! the recognizer reads those fields less reliably than the dates.

use crate::models::{DedupKey, ParsedLabel};

/// Placeholder for a missing field
pub const MISSING_FIELD: &str = "N/A";

/// Separator between key components
pub const KEY_SEPARATOR: char = '|';

/// Derive the deduplication key of a label
///
/// Total: a date index the label does not have becomes [`MISSING_FIELD`].
/// Values that are present are used verbatim, even when empty.
pub fn dedup_key(label: &ParsedLabel) -> DedupKey {
    let product = label.product_name.as_str();
    let first = label.date(0).unwrap_or(MISSING_FIELD);
    let second = label.date(1).unwrap_or(MISSING_FIELD);

    DedupKey::new(format!(
        "{product}{sep}{first}{sep}{second}",
        sep = KEY_SEPARATOR
    ))
}
