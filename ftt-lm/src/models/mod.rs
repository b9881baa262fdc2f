//! Data models for the label lifecycle manager

pub mod label;

pub use label::{DedupKey, LabelEntry, LifecycleState, ParsedLabel, DEFROSTED_LABEL_TYPE};
