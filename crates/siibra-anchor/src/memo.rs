// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Keyed compute-once caches.

use ahash::AHashMap;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::hash::Hash;
use std::sync::Arc;

/// A map whose values are computed at most once per key.
///
/// Concurrent callers asking for the same key block on the same cell, so
/// the initializer runs once. The map lock is not held while a value is
/// computed. Failed initializations are not cached.
pub struct OnceMap<K, V> {
    cells: Mutex<AHashMap<K, Arc<OnceCell<V>>>>,
}

impl<K, V> Default for OnceMap<K, V> {
    fn default() -> Self {
        Self {
            cells: Mutex::new(AHashMap::new()),
        }
    }
}

impl<K: Eq + Hash, V: Clone> OnceMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_try_init<E>(&self, key: K, init: impl FnOnce() -> Result<V, E>) -> Result<V, E> {
        let cell = self.cells.lock().entry(key).or_default().clone();
        cell.get_or_try_init(init).cloned()
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let cell = self.cells.lock().get(key).cloned()?;
        cell.get().cloned()
    }

    /// Number of initialized entries.
    pub fn len(&self) -> usize {
        self.cells.lock().values().filter(|c| c.get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.cells.lock().clear();
    }
}
