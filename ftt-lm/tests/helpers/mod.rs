//! Test Helper Utilities
//!
//! Fake collaborators shared by the ftt-lm integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use ftt_lm::camera::{Camera, CaptureError};
use ftt_lm::db::LabelSink;
use ftt_lm::models::{DedupKey, ParsedLabel};
use ftt_lm::services::{RecognitionError, Recognizer};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Build a label with the given product, type and dates
pub fn label(product: &str, label_type: &str, dates: &[&str]) -> ParsedLabel {
    ParsedLabel {
        label_id: format!("{}-id", product),
        product_name: product.to_string(),
        batch_no: "B1".to_string(),
        employee_name: "Alex".to_string(),
        label_type: label_type.to_string(),
        dates: dates.iter().map(|d| d.to_string()).collect(),
    }
}

/// Camera that is always ready and returns a fixed frame
pub struct StaticCamera;

#[async_trait]
impl Camera for StaticCamera {
    async fn wait_ready(&self) {}

    async fn capture(&self) -> Result<Vec<u8>, CaptureError> {
        Ok(b"frame".to_vec())
    }
}

/// Returns the same labels on every call
pub struct FixedRecognizer {
    labels: Vec<ParsedLabel>,
    pub calls: AtomicUsize,
}

impl FixedRecognizer {
    pub fn new(labels: Vec<ParsedLabel>) -> Self {
        Self {
            labels,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Recognizer for FixedRecognizer {
    async fn submit(&self, _image: Vec<u8>) -> Result<Vec<ParsedLabel>, RecognitionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.labels.clone())
    }

    async fn warm_up(&self) -> Result<(), RecognitionError> {
        Err(RecognitionError::Network("offline".to_string()))
    }
}

/// In-memory persistence sink
#[derive(Default)]
pub struct MemorySink {
    pub saved: Mutex<Vec<(DedupKey, ParsedLabel)>>,
    pub preloaded: Vec<DedupKey>,
}

impl MemorySink {
    pub fn with_keys(keys: Vec<DedupKey>) -> Self {
        Self {
            saved: Mutex::new(Vec::new()),
            preloaded: keys,
        }
    }

    pub fn saved_keys(&self) -> Vec<DedupKey> {
        self.saved.lock().unwrap().iter().map(|(k, _)| k.clone()).collect()
    }
}

#[async_trait]
impl LabelSink for MemorySink {
    async fn save(&self, key: &DedupKey, label: &ParsedLabel) -> ftt_common::Result<()> {
        self.saved.lock().unwrap().push((key.clone(), label.clone()));
        Ok(())
    }

    async fn load_committed_keys(&self) -> ftt_common::Result<Vec<DedupKey>> {
        Ok(self.preloaded.clone())
    }
}
