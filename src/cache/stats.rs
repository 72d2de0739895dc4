//! Cache Statistics Module
//!
//! Tracks hits, misses and the different ways entries leave the cache.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Reads that returned a payload
    pub hits: u64,
    /// Reads that found nothing, an expired entry, or a reclaimed payload
    pub misses: u64,
    /// Entries removed by the sweeper after their TTL elapsed
    pub expirations: u64,
    /// Payloads dropped under capacity pressure
    pub reclamations: u64,
    /// Keys removed by explicit `evict`
    pub evictions: u64,
    /// Keys currently holding a payload
    pub live_entries: usize,
    /// Slots in the expiry queue, stale ones included
    pub queued_handles: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_expirations(&mut self, count: u64) {
        self.expirations += count;
    }

    pub fn record_reclamation(&mut self) {
        self.reclamations += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }
}
