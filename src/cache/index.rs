//! Key Index Module
//!
//! Maps each key to the one handle that currently represents it.

use std::collections::HashMap;

use crate::cache::ExpiryHandle;

// == Key Index ==
/// Strongly-keyed map from key to its current handle.
#[derive(Debug, Default)]
pub struct KeyIndex {
    handles: HashMap<String, ExpiryHandle>,
}

impl KeyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&ExpiryHandle> {
        self.handles.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ExpiryHandle> {
        self.handles.get_mut(key)
    }

    /// Installs `handle` for its key, returning the handle it superseded.
    pub fn insert(&mut self, handle: ExpiryHandle) -> Option<ExpiryHandle> {
        self.handles.insert(handle.key().to_string(), handle)
    }

    pub fn remove(&mut self, key: &str) -> Option<ExpiryHandle> {
        self.handles.remove(key)
    }

    // == Remove If Current ==
    /// Removes the key only while it still maps to handle `id`.
    pub fn remove_if_current(&mut self, key: &str, id: u64) -> Option<ExpiryHandle> {
        if self.holds(key, id) {
            self.handles.remove(key)
        } else {
            None
        }
    }

    /// Whether `key` currently maps to handle `id`.
    pub fn holds(&self, key: &str, id: u64) -> bool {
        self.handles.get(key).is_some_and(|h| h.id() == id)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn clear(&mut self) {
        self.handles.clear();
    }
}
