//! Pending label store
//!
//! Ordered, deduplicating collection of labels awaiting triage, together with
//! the session's [`CommittedSet`]. Both live behind one `RwLock` so that an
//! insert racing a commit for the same key cannot interleave: the membership
//! check and the mutation always happen in the same critical section.
//!
//! Every successful mutation publishes a position-aware [`LabelEvent`] while
//! the write lock is still held, so subscribers see events in mutation order.

use crate::models::{DedupKey, LabelEntry, ParsedLabel};
use crate::services::committed_set::CommittedSet;
use ftt_common::events::{EventBus, LabelEvent, RemovalReason};
use indexmap::IndexMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct Ledger {
    /// Insertion-ordered pending entries
    pending: IndexMap<DedupKey, ParsedLabel>,
    committed: CommittedSet,
}

/// Pending labels plus committed keys, guarded by a single lock
pub struct LabelStore {
    ledger: RwLock<Ledger>,
    event_bus: EventBus,
}

impl LabelStore {
    pub fn new(event_bus: EventBus) -> Self {
        Self {
            ledger: RwLock::new(Ledger::default()),
            event_bus,
        }
    }

    /// Insert a label unless its key is pending or committed
    ///
    /// Returns whether the label was inserted. New entries go to the end.
    pub async fn try_insert(&self, key: DedupKey, label: ParsedLabel) -> bool {
        let mut ledger = self.ledger.write().await;

        if ledger.committed.contains(&key) {
            debug!(key = %key, "Skipping label: already committed");
            return false;
        }
        if ledger.pending.contains_key(&key) {
            debug!(key = %key, "Skipping label: already pending");
            return false;
        }

        let product_name = label.product_name.clone();
        let (position, _) = ledger.pending.insert_full(key.clone(), label);

        info!(key = %key, position, "Pending label inserted");
        self.event_bus.emit_lossy(LabelEvent::LabelInserted {
            key: key.into_inner(),
            product_name,
            position,
            timestamp: ftt_common::time::now(),
        });

        true
    }

    /// Remove a pending label without committing it
    ///
    /// No-op when the key is not pending. The key may be inserted again later.
    pub async fn remove(&self, key: &DedupKey) -> Option<ParsedLabel> {
        let mut ledger = self.ledger.write().await;
        self.take_pending(&mut ledger, key, RemovalReason::Discarded)
    }

    /// Remove a pending label and exclude its key for the rest of the session
    ///
    /// Both steps happen under one write lock. Returns `None` (and commits
    /// nothing) when the key is not pending.
    pub async fn commit(&self, key: &DedupKey) -> Option<ParsedLabel> {
        let mut ledger = self.ledger.write().await;
        let label = self.take_pending(&mut ledger, key, RemovalReason::Committed)?;
        ledger.committed.insert(key.clone());
        Some(label)
    }

    /// Insertion-ordered copy of the pending entries
    pub async fn snapshot(&self) -> Vec<LabelEntry> {
        let ledger = self.ledger.read().await;
        ledger
            .pending
            .iter()
            .map(|(key, label)| LabelEntry {
                key: key.clone(),
                label: label.clone(),
            })
            .collect()
    }

    /// Mark keys committed in an earlier session
    ///
    /// Returns how many keys were new to the set. Pending entries with a
    /// seeded key are left alone; seeding normally runs before ingestion.
    pub async fn seed_committed<I>(&self, keys: I) -> usize
    where
        I: IntoIterator<Item = DedupKey>,
    {
        let mut ledger = self.ledger.write().await;
        let before = ledger.committed.len();
        ledger.committed.extend(keys);
        ledger.committed.len() - before
    }

    pub async fn is_committed(&self, key: &DedupKey) -> bool {
        self.ledger.read().await.committed.contains(key)
    }

    pub async fn contains(&self, key: &DedupKey) -> bool {
        self.ledger.read().await.pending.contains_key(key)
    }

    /// Number of pending entries
    pub async fn len(&self) -> usize {
        self.ledger.read().await.pending.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.ledger.read().await.pending.is_empty()
    }

    /// Number of committed keys
    pub async fn committed_len(&self) -> usize {
        self.ledger.read().await.committed.len()
    }

    fn take_pending(
        &self,
        ledger: &mut Ledger,
        key: &DedupKey,
        reason: RemovalReason,
    ) -> Option<ParsedLabel> {
        let (position, _, label) = ledger.pending.shift_remove_full(key)?;

        info!(key = %key, position, ?reason, "Pending label removed");
        self.event_bus.emit_lossy(LabelEvent::LabelRemoved {
            key: key.as_str().to_string(),
            position,
            reason,
            timestamp: ftt_common::time::now(),
        });

        Some(label)
    }
}
