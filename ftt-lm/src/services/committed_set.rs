//! Keys confirmed by the user during this session
//!
//! The set only grows: there is no removal operation. It is owned by the
//! [`LabelStore`](super::label_store::LabelStore) so that membership checks and
//! store mutations happen under one lock.

use crate::models::DedupKey;
use std::collections::HashSet;

#[derive(Debug, Default, Clone)]
pub struct CommittedSet {
    keys: HashSet<DedupKey>,
}

impl CommittedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &DedupKey) -> bool {
        self.keys.contains(key)
    }

    /// Add a key; returns false if it was already committed
    pub fn insert(&mut self, key: DedupKey) -> bool {
        self.keys.insert(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Extend<DedupKey> for CommittedSet {
    fn extend<I: IntoIterator<Item = DedupKey>>(&mut self, iter: I) {
        self.keys.extend(iter);
    }
}
