//! Triage controller
//!
//! Resolves a pending label the user acted on:
//! - **discard**: drop it from the store; the same key may come back later
//! - **commit**: drop it and exclude its key for the rest of the session, then
//!   hand the label to the persistence sink without waiting for the result

use crate::db::LabelSink;
use crate::models::{DedupKey, ParsedLabel};
use crate::services::label_store::LabelStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of a triage action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriageOutcome {
    Committed(ParsedLabel),
    Discarded(ParsedLabel),
    /// The key was not pending (already triaged, or never inserted)
    NotPending,
}

#[derive(Clone)]
pub struct TriageController {
    store: Arc<LabelStore>,
    sink: Arc<dyn LabelSink>,
}

impl TriageController {
    pub fn new(store: Arc<LabelStore>, sink: Arc<dyn LabelSink>) -> Self {
        Self { store, sink }
    }

    pub async fn discard(&self, key: &DedupKey) -> TriageOutcome {
        match self.store.remove(key).await {
            Some(label) => {
                info!(key = %key, "Label discarded");
                TriageOutcome::Discarded(label)
            }
            None => {
                debug!(key = %key, "Discard ignored: key not pending");
                TriageOutcome::NotPending
            }
        }
    }

    pub async fn commit(&self, key: &DedupKey) -> TriageOutcome {
        let Some(label) = self.store.commit(key).await else {
            debug!(key = %key, "Commit ignored: key not pending");
            return TriageOutcome::NotPending;
        };

        info!(key = %key, product = %label.product_name, "Label committed");

        // Persist in the background; the in-memory commit stands either way
        let sink = Arc::clone(&self.sink);
        let persisted_key = key.clone();
        let persisted_label = label.clone();
        tokio::spawn(async move {
            if let Err(e) = sink.save(&persisted_key, &persisted_label).await {
                warn!(key = %persisted_key, error = %e, "Failed to persist committed label");
            }
        });

        TriageOutcome::Committed(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::key_generator::dedup_key;
    use async_trait::async_trait;
    use ftt_common::events::EventBus;
    use std::time::Duration;
    use tokio::sync::mpsc;

    /// Forwards saves to a channel; optionally fails them
    struct ChannelSink {
        tx: mpsc::UnboundedSender<DedupKey>,
        fail: bool,
    }

    #[async_trait]
    impl LabelSink for ChannelSink {
        async fn save(&self, key: &DedupKey, _label: &ParsedLabel) -> ftt_common::Result<()> {
            let _ = self.tx.send(key.clone());
            if self.fail {
                return Err(ftt_common::Error::Internal("disk full".to_string()));
            }
            Ok(())
        }

        async fn load_committed_keys(&self) -> ftt_common::Result<Vec<DedupKey>> {
            Ok(Vec::new())
        }
    }

    fn setup(fail: bool) -> (Arc<LabelStore>, TriageController, mpsc::UnboundedReceiver<DedupKey>) {
        let store = Arc::new(LabelStore::new(EventBus::new(16)));
        let (tx, rx) = mpsc::unbounded_channel();
        let triage = TriageController::new(Arc::clone(&store), Arc::new(ChannelSink { tx, fail }));
        (store, triage, rx)
    }

    fn label(product: &str) -> (DedupKey, ParsedLabel) {
        let label = ParsedLabel {
            product_name: product.to_string(),
            dates: vec!["01/01/24 10:00".to_string(), "03/01/24 10:00".to_string()],
            ..Default::default()
        };
        (dedup_key(&label), label)
    }

    #[tokio::test]
    async fn test_commit_is_permanent() {
        let (store, triage, mut rx) = setup(false);
        let (key, l) = label("soy sauce");

        store.try_insert(key.clone(), l.clone()).await;
        assert_eq!(triage.commit(&key).await, TriageOutcome::Committed(l.clone()));

        let saved = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await.unwrap();
        assert_eq!(saved, Some(key.clone()));

        assert!(!store.try_insert(key, l).await);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_discard_allows_reinsert() {
        let (store, triage, mut rx) = setup(false);
        let (key, l) = label("sesame oil");

        store.try_insert(key.clone(), l.clone()).await;
        assert_eq!(triage.discard(&key).await, TriageOutcome::Discarded(l.clone()));
        assert!(!store.is_committed(&key).await);
        assert!(store.try_insert(key, l).await);

        // Discard never persists
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_persistence_failure_keeps_commit() {
        let (store, triage, mut rx) = setup(true);
        let (key, l) = label("ginger chicken");

        store.try_insert(key.clone(), l).await;
        triage.commit(&key).await;
        tokio::time::timeout(Duration::from_secs(1), rx.recv()).await.unwrap();

        assert!(store.is_committed(&key).await);
    }

    #[tokio::test]
    async fn test_unknown_key_not_pending() {
        let (store, triage, _rx) = setup(false);
        let key = DedupKey::new("nothing|N/A|N/A");

        assert_eq!(triage.commit(&key).await, TriageOutcome::NotPending);
        assert_eq!(triage.discard(&key).await, TriageOutcome::NotPending);
        assert!(!store.is_committed(&key).await);
    }

    #[tokio::test]
    async fn test_second_commit_is_not_pending() {
        let (store, triage, _rx) = setup(false);
        let (key, l) = label("garlic paste");

        store.try_insert(key.clone(), l).await;
        assert!(matches!(triage.commit(&key).await, TriageOutcome::Committed(_)));
        assert_eq!(triage.commit(&key).await, TriageOutcome::NotPending);
    }
}
