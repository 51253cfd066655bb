//! Keyed debounce scheduling for deferred writes.
//!
//! # Responsibility
//! - Hold at most one pending write per key.
//! - Release writes whose quiet period has elapsed, oldest schedule first.
//!
//! # Invariants
//! - Rescheduling a key replaces its value and deadline and cancels the
//!   previous token: only the latest value is ever released.
//! - Released writes come out in the order they were last scheduled, so
//!   writes are skipped but never reordered.

use std::collections::BTreeMap;
use std::time::Duration;

/// Handle for one scheduled write; superseded tokens never fire.
pub type WriteToken = u64;

#[derive(Debug, Clone)]
struct PendingWrite<V> {
    value: V,
    deadline: Duration,
    token: WriteToken,
}

/// Per-key debouncer driven by an external clock.
#[derive(Debug, Clone)]
pub struct Debouncer<K, V> {
    delay: Duration,
    pending: BTreeMap<K, PendingWrite<V>>,
    next_token: WriteToken,
}

impl<K: Ord + Clone, V> Debouncer<K, V> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: BTreeMap::new(),
            next_token: 0,
        }
    }

    /// True when writes should bypass scheduling entirely.
    pub fn is_immediate(&self) -> bool {
        self.delay.is_zero()
    }

    /// Schedules `value` for `key`, superseding any pending write for it.
    pub fn schedule(&mut self, key: K, value: V, now: Duration) -> WriteToken {
        self.next_token += 1;
        let token = self.next_token;
        self.pending.insert(
            key,
            PendingWrite {
                value,
                deadline: now + self.delay,
                token,
            },
        );
        token
    }

    /// Drops the pending write for `key`, returning its value.
    pub fn cancel(&mut self, key: &K) -> Option<V> {
        self.pending.remove(key).map(|write| write.value)
    }

    /// Drops every pending write.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn pending(&self, key: &K) -> Option<&V> {
        self.pending.get(key).map(|write| &write.value)
    }

    /// Token of the live pending write for `key`.
    pub fn token(&self, key: &K) -> Option<WriteToken> {
        self.pending.get(key).map(|write| write.token)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Removes and returns every write whose deadline is at or before `now`.
    pub fn take_due(&mut self, now: Duration) -> Vec<(K, V)> {
        let due_keys: Vec<K> = self
            .pending
            .iter()
            .filter(|(_, write)| write.deadline <= now)
            .map(|(key, _)| key.clone())
            .collect();
        self.take_keys(due_keys)
    }

    /// Removes and returns every pending write regardless of deadline.
    pub fn drain(&mut self) -> Vec<(K, V)> {
        let keys: Vec<K> = self.pending.keys().cloned().collect();
        self.take_keys(keys)
    }

    fn take_keys(&mut self, keys: Vec<K>) -> Vec<(K, V)> {
        let mut taken: Vec<(WriteToken, K, V)> = keys
            .into_iter()
            .filter_map(|key| {
                self.pending
                    .remove(&key)
                    .map(|write| (write.token, key, write.value))
            })
            .collect();
        taken.sort_by_key(|(token, _, _)| *token);
        taken
            .into_iter()
            .map(|(_, key, value)| (key, value))
            .collect()
    }
}
