//! Buffer-and-drain for updates that can arrive before their target.
//!
//! Two independently loaded sources (here: the roster and the live event
//! stream) race. An update whose target does not exist yet is kept, keyed by
//! target, and applied once the target shows up. Later updates for the same
//! key replace earlier ones, since each carries the full latest value.

use std::{collections::HashMap, hash::Hash};

#[derive(Debug)]
pub struct DeferredApply<K, V> {
    pending: HashMap<K, V>,
}

impl<K, V> Default for DeferredApply<K, V> {
    fn default() -> Self {
        Self {
            pending: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V> DeferredApply<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try `apply` now; if it hands the value back (`Err`), keep it.
    ///
    /// Returns `true` when the value was applied immediately. An applied
    /// value also discards anything still buffered for the key.
    pub fn offer<F>(&mut self, key: K, value: V, apply: F) -> bool
    where
        F: FnOnce(&K, V) -> Result<(), V>,
    {
        match apply(&key, value) {
            Ok(()) => {
                self.pending.remove(&key);
                true
            }
            Err(value) => {
                self.pending.insert(key, value);
                false
            }
        }
    }

    /// Apply every buffered entry whose target is now available.
    ///
    /// Applied entries are removed, so each is applied exactly once; the
    /// rest stay buffered. Returns the number applied.
    pub fn drain<F>(&mut self, mut apply: F) -> usize
    where
        F: FnMut(&K, V) -> Result<(), V>,
    {
        let mut applied = 0;
        for (key, value) in std::mem::take(&mut self.pending) {
            match apply(&key, value) {
                Ok(()) => applied += 1,
                Err(value) => {
                    self.pending.insert(key, value);
                }
            }
        }
        applied
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.pending.get(key)
    }
}
