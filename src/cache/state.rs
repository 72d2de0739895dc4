//! Cache State Module
//!
//! The key index, expiry queue and reclamation order, kept consistent with
//! one another. A `CacheState` is always accessed under the store's lock;
//! nothing in here synchronizes on its own.

use std::any::Any;
use std::sync::Arc;

use tracing::debug;

use crate::cache::{
    CacheEntry, CacheStats, CacheValue, ExpiryHandle, ExpiryQueue, KeyIndex, LruTracker,
};
use crate::error::{CacheError, Result};

// == Sweep Report ==
/// What a single sweep tick removed from the queue head.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Live entries whose TTL elapsed
    pub expired: usize,
    /// Handles whose payload had already been reclaimed
    pub reclaimed: usize,
    /// Slots left behind by evicted or superseded handles
    pub stale: usize,
}

impl SweepReport {
    pub fn total(&self) -> usize {
        self.expired + self.reclaimed + self.stale
    }
}

/// Widens any primitive integer payload to `i128`.
fn integer_value(value: &(dyn Any + Send + Sync)) -> Option<i128> {
    macro_rules! widen {
        ($($ty:ty),*) => {
            $(
                if let Some(n) = value.downcast_ref::<$ty>() {
                    return Some(*n as i128);
                }
            )*
        };
    }
    widen!(i64, i32, u64, u32, usize, isize, i16, u16, i8, u8);
    None
}

enum Head {
    Reclaimed,
    Due,
    Stale,
    Pending,
}

// == Cache State ==
#[derive(Debug)]
pub struct CacheState {
    index: KeyIndex,
    queue: ExpiryQueue,
    lru: LruTracker,
    stats: CacheStats,
    default_ttl: i64,
    max_entries: usize,
    next_handle_id: u64,
}

impl CacheState {
    // == Constructor ==
    /// Creates empty state.
    ///
    /// # Arguments
    /// * `default_ttl` - TTL in seconds used when a put passes `ttl <= 0`
    /// * `max_entries` - Live payload cap, 0 for unbounded
    pub fn new(default_ttl: i64, max_entries: usize) -> Self {
        Self {
            index: KeyIndex::new(),
            queue: ExpiryQueue::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            default_ttl,
            max_entries,
            next_handle_id: 0,
        }
    }

    pub fn default_ttl(&self) -> i64 {
        self.default_ttl
    }

    // == Set Default TTL ==
    /// Zero is rejected since a zero TTL at a call site means "use the default".
    pub fn set_default_ttl(&mut self, ttl_secs: i64) -> Result<()> {
        if ttl_secs == 0 {
            return Err(CacheError::InvalidArgument(
                "default TTL must not be 0".to_string(),
            ));
        }
        self.default_ttl = ttl_secs;
        Ok(())
    }

    fn effective_ttl(&self, ttl_secs: i64) -> i64 {
        if ttl_secs <= 0 {
            self.default_ttl
        } else {
            ttl_secs
        }
    }

    // == Put ==
    /// Stores `value` under `key`.
    ///
    /// A key with a live handle is updated in place and its queue slot is
    /// repositioned. Otherwise a new handle is installed; any handle it
    /// supersedes (one whose payload was reclaimed) is left for the sweeper.
    pub fn put(&mut self, key: &str, value: CacheValue, ttl_secs: i64) -> Result<()> {
        if key.is_empty() {
            return Err(CacheError::NullKey);
        }
        let entry = CacheEntry::new(key.to_string(), value, self.effective_ttl(ttl_secs));

        if let Some(handle) = self.index.get_mut(key).filter(|h| !h.is_reclaimed()) {
            let old_slot = handle.slot();
            handle.replace(entry);
            let new_slot = handle.slot();
            self.queue.remove(&old_slot);
            self.queue.push(new_slot);
        } else {
            let handle = ExpiryHandle::new(self.next_handle_id, entry);
            self.next_handle_id += 1;
            self.queue.push(handle.slot());
            self.index.insert(handle);
        }

        self.lru.touch(key);
        self.enforce_capacity();
        Ok(())
    }

    fn enforce_capacity(&mut self) {
        if self.max_entries == 0 {
            return;
        }
        while self.lru.len() > self.max_entries {
            let Some(key) = self.lru.pop_oldest() else {
                break;
            };
            if let Some(handle) = self.index.get_mut(&key) {
                let old_slot = handle.slot();
                if handle.reclaim() {
                    // Jumps ahead of any pending head so the next tick drops it
                    self.queue.remove(&old_slot);
                    self.queue.push(handle.slot());
                    self.stats.record_reclamation();
                    debug!(key = %key, "Reclaimed least recently used payload");
                }
            }
        }
    }

    fn live_entry(&self, key: &str, now: u64) -> Option<&CacheEntry> {
        self.index
            .get(key)?
            .dereference()
            .filter(|entry| !entry.is_expired(now))
    }

    // == Get ==
    /// Returns the payload for `key` unless it is missing, reclaimed, or past
    /// its expiry at `now`. Nothing is pruned here.
    pub fn get(&mut self, key: &str, now: u64) -> Option<CacheValue> {
        match self.live_entry(key, now).map(|entry| entry.value.clone()) {
            Some(value) => {
                self.stats.record_hit();
                self.lru.touch(key);
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Evict ==
    /// Drops the key from the index. Its queue slot goes stale and is
    /// discarded when it reaches the head.
    pub fn evict(&mut self, key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(CacheError::NullKey);
        }
        if self.index.remove(key).is_some() {
            self.lru.remove(key);
            self.stats.record_eviction();
        }
        Ok(())
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.index.clear();
        self.queue.clear();
        self.lru.clear();
    }

    // == Add ==
    /// Adds `delta` to the integer under `key` and returns the value before
    /// the update. A missing key counts as 0.
    ///
    /// Any primitive integer payload is accepted. The updated counter is
    /// always stored as `i64`.
    pub fn add(&mut self, key: &str, delta: i64, ttl_secs: i64, now: u64) -> Result<i64> {
        if key.is_empty() {
            return Err(CacheError::NullKey);
        }
        let previous = match self.live_entry(key, now) {
            Some(entry) => {
                let wide = integer_value(entry.value.as_ref()).ok_or_else(|| {
                    CacheError::IllegalState(format!("value under key '{key}' is not an integer"))
                })?;
                i64::try_from(wide).map_err(|_| {
                    CacheError::IllegalState(format!("value under key '{key}' exceeds i64"))
                })?
            }
            None => 0,
        };
        let next = previous.checked_add(delta).ok_or_else(|| {
            CacheError::IllegalState(format!("counter under key '{key}' would overflow"))
        })?;

        self.put(key, Arc::new(next), ttl_secs)?;
        Ok(previous)
    }

    // == Sweep ==
    /// Drains due, reclaimed and stale slots from the head of the queue.
    ///
    /// An entry is due once its expiry falls before `now + margin_ms`. The
    /// tick stops at the first live handle that is not yet due.
    pub fn sweep(&mut self, now: u64, margin_ms: u64) -> SweepReport {
        let mut report = SweepReport::default();
        let horizon = now.saturating_add(margin_ms);

        loop {
            let head = match self.queue.peek() {
                None => break,
                Some(slot) => match self.index.get(&slot.key) {
                    Some(h) if h.id() == slot.handle_id && h.is_reclaimed() => Head::Reclaimed,
                    Some(h) if h.id() == slot.handle_id && slot.expires_at < horizon => Head::Due,
                    Some(h) if h.id() == slot.handle_id => Head::Pending,
                    _ => Head::Stale,
                },
            };

            let slot = match head {
                Head::Pending => break,
                _ => match self.queue.pop() {
                    Some(slot) => slot,
                    None => break,
                },
            };

            match head {
                Head::Reclaimed => {
                    self.index.remove_if_current(&slot.key, slot.handle_id);
                    report.reclaimed += 1;
                }
                Head::Due => {
                    self.index.remove_if_current(&slot.key, slot.handle_id);
                    self.lru.remove(&slot.key);
                    report.expired += 1;
                }
                Head::Stale | Head::Pending => report.stale += 1,
            }
        }

        self.stats.record_expirations(report.expired as u64);
        report
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.live_entries = self.lru.len();
        stats.queued_handles = self.queue.len();
        stats
    }

    /// Number of keys holding a payload.
    pub fn len(&self) -> usize {
        self.lru.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lru.is_empty()
    }

    /// Number of handles in the key index, reclaimed ones included.
    pub fn indexed(&self) -> usize {
        self.index.len()
    }

    /// Number of slots in the expiry queue, stale ones included.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }
}
