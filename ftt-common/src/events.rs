//! Label lifecycle events and the EventBus
//!
//! Events are broadcast via [`EventBus`] and serialized for SSE transmission to
//! the UI collaborator. Insert/remove events carry the entry's position so a
//! client can update its list incrementally instead of redrawing it.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Why a pending label left the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalReason {
    /// User confirmed the label; its key is excluded for the rest of the session
    Committed,
    /// User dismissed the label; the key may be recognized again
    Discarded,
}

/// FTT event types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LabelEvent {
    /// A new pending label was appended to the store
    LabelInserted {
        /// Deduplication key of the entry
        key: String,
        /// Product name, for log/UI convenience
        product_name: String,
        /// 0-based position the entry now occupies
        position: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A pending label was removed by triage
    LabelRemoved {
        key: String,
        /// 0-based position the entry occupied before removal
        position: usize,
        reason: RemovalReason,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Startup fan-out finished; the session accepts triage from here on
    SessionReady {
        /// Committed keys reloaded from persistence
        committed_keys: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl LabelEvent {
    /// Event type name, used as the SSE `event:` field
    pub fn event_type(&self) -> &'static str {
        match self {
            LabelEvent::LabelInserted { .. } => "LabelInserted",
            LabelEvent::LabelRemoved { .. } => "LabelRemoved",
            LabelEvent::SessionReady { .. } => "SessionReady",
        }
    }
}

/// Broadcast bus for [`LabelEvent`]s
///
/// Cheap to clone; all clones share the same channel.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<LabelEvent>,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// Slow subscribers lose the oldest events once `capacity` is exceeded.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<LabelEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: LabelEvent) {
        let _ = self.tx.send(event);
    }
}
