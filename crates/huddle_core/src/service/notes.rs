//! Per-member notes with debounced commits.
//!
//! # Responsibility
//! - Hold committed notes and in-flight edits separately.
//! - Coalesce rapid edits of one member into a single commit.
//!
//! # Invariants
//! - Edits for different members never delay each other.
//! - `note` always returns the most recent value supplied for a member.
//! - Removing a member drops both its committed note and its pending edit.

use crate::debounce::Debouncer;
use crate::model::member::MemberId;
use crate::repo::notes_repo::NotesMap;
use std::time::Duration;

/// Notes keyed by member id.
#[derive(Debug)]
pub struct NotesStore {
    committed: NotesMap,
    edits: Debouncer<MemberId, String>,
}

impl NotesStore {
    pub fn new(debounce: Duration) -> Self {
        Self::with_committed(NotesMap::new(), debounce)
    }

    pub fn with_committed(committed: NotesMap, debounce: Duration) -> Self {
        Self {
            committed,
            edits: Debouncer::new(debounce),
        }
    }

    /// Records an edit. Returns `true` when it was committed right away.
    pub fn update(&mut self, member_id: MemberId, text: String, now: Duration) -> bool {
        if self.edits.is_immediate() {
            self.committed.insert(member_id, text);
            return true;
        }
        self.edits.schedule(member_id, text, now);
        false
    }

    /// Latest value for the member, pending edit first.
    pub fn note(&self, member_id: MemberId) -> Option<&str> {
        self.edits
            .pending(&member_id)
            .or_else(|| self.committed.get(&member_id))
            .map(String::as_str)
    }

    pub fn committed(&self) -> &NotesMap {
        &self.committed
    }

    pub fn has_pending(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Drops everything held for the member. Returns `true` when a committed
    /// note was removed.
    pub fn remove(&mut self, member_id: MemberId) -> bool {
        self.edits.cancel(&member_id);
        self.committed.remove(&member_id).is_some()
    }

    pub fn clear(&mut self) {
        self.committed.clear();
        self.edits.clear();
    }

    /// Commits edits whose quiet period ended. Returns the number committed.
    pub fn commit_due(&mut self, now: Duration) -> usize {
        let due = self.edits.take_due(now);
        self.commit(due)
    }

    /// Commits every pending edit. Returns the number committed.
    pub fn commit_all(&mut self) -> usize {
        let pending = self.edits.drain();
        self.commit(pending)
    }

    fn commit(&mut self, edits: Vec<(MemberId, String)>) -> usize {
        let count = edits.len();
        self.committed.extend(edits);
        count
    }
}
