//! Staged edits, keyed by record

use std::collections::HashMap;
use std::hash::Hash;

/// Uncommitted edits for a bulk-edit screen. An entry exists only while a
/// record is dirty; committing or discarding removes it, so the
/// authoritative value shows through again.
#[derive(Debug)]
pub struct PendingChanges<K, V> {
    staged: HashMap<K, V>,
}

impl<K, V> Default for PendingChanges<K, V> {
    fn default() -> Self {
        Self {
            staged: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Copy, V> PendingChanges<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&mut self, key: K, value: V) {
        self.staged.insert(key, value);
    }

    pub fn get(&self, key: K) -> Option<&V> {
        self.staged.get(&key)
    }

    /// The staged value, seeding it from `default` on first touch.
    pub fn entry_or(&mut self, key: K, default: impl FnOnce() -> V) -> &mut V {
        self.staged.entry(key).or_insert_with(default)
    }

    pub fn is_dirty(&self, key: K) -> bool {
        self.staged.contains_key(&key)
    }

    pub fn has_changes(&self) -> bool {
        !self.staged.is_empty()
    }

    pub fn dirty_keys(&self) -> Vec<K> {
        self.staged.keys().copied().collect()
    }

    pub fn discard(&mut self, key: K) {
        self.staged.remove(&key);
    }

    /// Removes and returns the staged value, typically to commit it.
    pub fn take(&mut self, key: K) -> Option<V> {
        self.staged.remove(&key)
    }
}
