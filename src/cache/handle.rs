//! Expiry Handle Module
//!
//! A handle owns a cache entry through a reclaimable slot: once the payload is
//! reclaimed under capacity pressure, the handle survives but dereferences to
//! nothing. A reclaimed handle sorts to the front of the expiry queue so the
//! next sweep discards it.

use std::cmp::Ordering;

use crate::cache::CacheEntry;

// == Queue Slot ==
/// Position of a handle in the expiry queue.
///
/// Ordered by absolute expiry, then key, then handle id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueSlot {
    /// Absolute expiry in Unix milliseconds
    pub expires_at: u64,
    /// Key of the handle
    pub key: String,
    /// Identity of the handle this slot was issued for
    pub handle_id: u64,
}

impl Ord for QueueSlot {
    fn cmp(&self, other: &Self) -> Ordering {
        self.expires_at
            .cmp(&other.expires_at)
            .then_with(|| self.key.cmp(&other.key))
            .then_with(|| self.handle_id.cmp(&other.handle_id))
    }
}

impl PartialOrd for QueueSlot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// == Expiry Handle ==
/// Reclaimable owner of a `CacheEntry`, orderable by absolute expiry.
#[derive(Debug)]
pub struct ExpiryHandle {
    id: u64,
    key: String,
    expires_at: u64,
    entry: Option<CacheEntry>,
}

impl ExpiryHandle {
    /// Wraps `entry` in a handle with identity `id`.
    pub fn new(id: u64, entry: CacheEntry) -> Self {
        Self {
            id,
            key: entry.key.clone(),
            expires_at: entry.expires_at(),
            entry: Some(entry),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Absolute expiry of the entry as it was when last stored.
    pub fn expires_at(&self) -> u64 {
        self.expires_at
    }

    // == Dereference ==
    /// Returns the entry, or None once its payload has been reclaimed.
    pub fn dereference(&self) -> Option<&CacheEntry> {
        self.entry.as_ref()
    }

    /// Replaces the entry in place. The caller must reposition the handle's
    /// queue slot, since the expiry changes.
    pub fn replace(&mut self, entry: CacheEntry) {
        self.expires_at = entry.expires_at();
        self.entry = Some(entry);
    }

    // == Reclaim ==
    /// Drops the payload and moves the handle's expiry to the epoch.
    /// Returns false if it was already gone.
    ///
    /// The caller must reposition the handle's queue slot, since `slot()`
    /// changes here.
    pub fn reclaim(&mut self) -> bool {
        if self.entry.take().is_none() {
            return false;
        }
        self.expires_at = 0;
        true
    }

    pub fn is_reclaimed(&self) -> bool {
        self.entry.is_none()
    }

    /// Queue position for the handle's current expiry.
    pub fn slot(&self) -> QueueSlot {
        QueueSlot {
            expires_at: self.expires_at,
            key: self.key.clone(),
            handle_id: self.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn handle(id: u64, key: &str, ttl: i64) -> ExpiryHandle {
        ExpiryHandle::new(id, CacheEntry::new(key.to_string(), Arc::new(1_i64), ttl))
    }

    #[test]
    fn test_handle_dereference_and_reclaim() {
        let mut handle = handle(1, "a", 10);

        assert!(handle.dereference().is_some());
        assert!(handle.reclaim());
        assert!(handle.is_reclaimed());
        assert!(handle.dereference().is_none());
        assert_eq!(handle.expires_at(), 0, "Reclaimed handle sorts first");
        assert!(!handle.reclaim(), "Second reclaim finds nothing");
    }

    #[test]
    fn test_slot_ordering_by_expiry_then_key() {
        let early = QueueSlot { expires_at: 10, key: "z".to_string(), handle_id: 9 };
        let late = QueueSlot { expires_at: 20, key: "a".to_string(), handle_id: 1 };
        let tie = QueueSlot { expires_at: 10, key: "b".to_string(), handle_id: 5 };

        assert!(early < late);
        assert!(tie < early, "Equal expiry falls back to key order");
    }

    #[test]
    fn test_replace_moves_expiry() {
        let mut handle = handle(3, "a", 1);
        let before = handle.slot();

        handle.replace(CacheEntry::new("a".to_string(), Arc::new(2_i64), 100));

        let after = handle.slot();
        assert!(after.expires_at > before.expires_at);
        assert_eq!(after.handle_id, before.handle_id);
        assert!(!handle.is_reclaimed());
    }
}
