//! Recognition result ingestion
//!
//! Turns one recognition response into store inserts: optional catalog
//! filter, key derivation, then `try_insert` per label.

use crate::models::ParsedLabel;
use crate::services::key_generator::dedup_key;
use crate::services::label_store::LabelStore;
use crate::services::product_catalog::ProductCatalog;
use std::sync::Arc;
use tracing::debug;

/// Outcome of ingesting one recognition response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub received: usize,
    pub filtered_out: usize,
    pub inserted: usize,
    /// Already pending or committed
    pub rejected: usize,
}

pub struct LabelIngestor {
    store: Arc<LabelStore>,
    catalog: Option<ProductCatalog>,
}

impl LabelIngestor {
    /// `catalog` enables product filtering when `Some`
    pub fn new(store: Arc<LabelStore>, catalog: Option<ProductCatalog>) -> Self {
        Self { store, catalog }
    }

    pub async fn ingest(&self, labels: Vec<ParsedLabel>) -> IngestReport {
        let mut report = IngestReport {
            received: labels.len(),
            ..Default::default()
        };

        let candidates = match &self.catalog {
            Some(catalog) => catalog.filter(labels),
            None => labels,
        };
        report.filtered_out = report.received - candidates.len();

        for label in candidates {
            let key = dedup_key(&label);
            if self.store.try_insert(key, label).await {
                report.inserted += 1;
            } else {
                report.rejected += 1;
            }
        }

        debug!(
            received = report.received,
            filtered_out = report.filtered_out,
            inserted = report.inserted,
            rejected = report.rejected,
            "Ingested recognition result"
        );
        report
    }
}
