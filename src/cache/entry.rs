//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::any::Any;
use std::sync::Arc;

use chrono::Utc;

/// Type-erased payload stored in the cache.
pub type CacheValue = Arc<dyn Any + Send + Sync>;

// == Cache Entry ==
/// A single cached value with its key, creation time and TTL.
#[derive(Clone)]
pub struct CacheEntry {
    /// Key the entry is stored under
    pub key: String,
    /// The stored value
    pub value: CacheValue,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// TTL in seconds; negative means the entry never expires
    pub ttl_secs: i64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current time.
    ///
    /// # Arguments
    /// * `key` - The key the entry belongs to
    /// * `value` - The value to store
    /// * `ttl_secs` - Effective TTL in seconds (already resolved against the default)
    pub fn new(key: String, value: CacheValue, ttl_secs: i64) -> Self {
        Self {
            key,
            value,
            created_at: current_timestamp_ms(),
            ttl_secs,
        }
    }

    // == Expires At ==
    /// Absolute expiry time in Unix milliseconds, `u64::MAX` when the entry never expires.
    pub fn expires_at(&self) -> u64 {
        if self.ttl_secs < 0 {
            return u64::MAX;
        }
        let ttl_ms = (self.ttl_secs as u64).saturating_mul(1000);
        self.created_at.saturating_add(ttl_ms)
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now` (Unix milliseconds).
    ///
    /// An entry is expired once `now` reaches its expiry time.
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at()
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, or None if the entry never expires.
    pub fn ttl_remaining_ms(&self) -> Option<u64> {
        if self.ttl_secs < 0 {
            return None;
        }
        Some(self.expires_at().saturating_sub(current_timestamp_ms()))
    }
}

impl std::fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheEntry")
            .field("key", &self.key)
            .field("created_at", &self.created_at)
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}
