//! Label lifecycle services
//!
//! Leaves first: key derivation and classification are pure; the store owns
//! all shared mutable state; ingestion, scheduling and triage build on it.

pub mod capture_scheduler;
pub mod committed_set;
pub mod ingest;
pub mod key_generator;
pub mod label_store;
pub mod product_catalog;
pub mod recognition_client;
pub mod state_classifier;
pub mod triage;

pub use capture_scheduler::CaptureScheduler;
pub use committed_set::CommittedSet;
pub use ingest::{IngestReport, LabelIngestor};
pub use key_generator::dedup_key;
pub use label_store::LabelStore;
pub use product_catalog::ProductCatalog;
pub use recognition_client::{RecognitionClient, RecognitionError, Recognizer};
pub use state_classifier::classify;
pub use triage::{TriageController, TriageOutcome};
