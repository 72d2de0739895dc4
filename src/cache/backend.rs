//! Cache Backend Trait
//!
//! The surface shared by every cache backend. Methods that take a TTL are
//! optional: a backend that has no notion of expiry leaves the defaults in
//! place and reports them as unsupported.

use std::any::Any;
use std::sync::Arc;

use crate::cache::CacheValue;
use crate::error::{CacheError, Result};

/// A named key-value cache.
pub trait Cache: Send + Sync {
    /// Name the cache was constructed with.
    fn name(&self) -> &str;

    /// Stores a value under the cache's default TTL.
    fn put(&self, key: &str, value: CacheValue) -> Result<()>;

    /// Stores a value with an explicit TTL in seconds; `ttl_secs <= 0` uses the default.
    fn put_with_ttl(&self, _key: &str, _value: CacheValue, _ttl_secs: i64) -> Result<()> {
        Err(CacheError::Unsupported("put_with_ttl"))
    }

    /// Returns the stored value, or None if absent, expired or reclaimed.
    fn get(&self, key: &str) -> Option<CacheValue>;

    fn evict(&self, key: &str) -> Result<()>;

    fn clear(&self);

    /// Increments the integer under `key`, returning the previous value.
    fn incr(&self, key: &str) -> Result<i64>;

    fn incr_with_ttl(&self, _key: &str, _ttl_secs: i64) -> Result<i64> {
        Err(CacheError::Unsupported("incr_with_ttl"))
    }

    /// Decrements the integer under `key`, returning the previous value.
    fn decr(&self, key: &str) -> Result<i64>;

    fn decr_with_ttl(&self, _key: &str, _ttl_secs: i64) -> Result<i64> {
        Err(CacheError::Unsupported("decr_with_ttl"))
    }

    fn set_default_ttl(&self, _ttl_secs: i64) -> Result<()> {
        Err(CacheError::Unsupported("set_default_ttl"))
    }

    /// Starts any background work. Idempotent.
    fn startup(&self) -> Result<()> {
        Ok(())
    }

    /// Empties the cache and stops background work. Idempotent.
    fn shutdown(&self) {}
}

impl dyn Cache {
    /// Typed lookup; None if absent or stored as a different type.
    pub fn get_as<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        self.get(key).and_then(downcast_value)
    }
}

/// Recovers a concrete payload type from a stored value.
pub fn downcast_value<T: Any + Send + Sync>(value: CacheValue) -> Option<Arc<T>> {
    value.downcast::<T>().ok()
}
