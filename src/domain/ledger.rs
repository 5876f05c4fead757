//! Ticket ledger
//!
//! Remembers the task-id sets of every ticket accepted in the current run.
//! Sets are compared regardless of order: each one is canonicalized into a
//! sorted [`TicketKey`] before it is stored or looked up.

use std::collections::HashSet;

use super::task::TaskId;

/// Canonical, order-independent form of a ticket's task-id set
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TicketKey(Box<[TaskId]>);

impl TicketKey {
    /// Builds the key by sorting and deduplicating the given ids
    pub fn new(ids: &[TaskId]) -> Self {
        let mut sorted = ids.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        Self(sorted.into_boxed_slice())
    }

    /// Returns the ids in ascending order
    pub fn ids(&self) -> &[TaskId] {
        &self.0
    }

    /// Short digest of the set, identical for any ordering of the same ids
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for id in self.0.iter() {
            hasher.update(&id.line().to_le_bytes());
        }
        let hex = hasher.finalize().to_hex();
        hex[..7].to_string()
    }
}

/// Set of accepted task-id sets for one generation run
#[derive(Debug, Default)]
pub struct TicketLedger {
    entries: HashSet<TicketKey>,
}

impl TicketLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a ticket with exactly these ids was already accepted
    pub fn contains(&self, ids: &[TaskId]) -> bool {
        self.entries.contains(&TicketKey::new(ids))
    }

    /// Records the id set; returns false if it was already present
    pub fn add(&mut self, ids: &[TaskId]) -> bool {
        self.entries.insert(TicketKey::new(ids))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
