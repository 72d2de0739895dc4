//! No-op Cache
//!
//! A backend that stores nothing. Useful where caching is switched off but
//! callers still expect a `Cache`.

use crate::cache::{Cache, CacheValue};
use crate::error::{CacheError, Result};

#[derive(Debug, Clone)]
pub struct NoopCache {
    name: String,
}

impl NoopCache {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Cache for NoopCache {
    fn name(&self) -> &str {
        &self.name
    }

    fn put(&self, key: &str, _value: CacheValue) -> Result<()> {
        if key.is_empty() {
            return Err(CacheError::NullKey);
        }
        Ok(())
    }

    fn get(&self, _key: &str) -> Option<CacheValue> {
        None
    }

    fn evict(&self, key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(CacheError::NullKey);
        }
        Ok(())
    }

    fn clear(&self) {}

    // Nothing is ever stored, so every counter starts from 0.
    fn incr(&self, _key: &str) -> Result<i64> {
        Ok(0)
    }

    fn decr(&self, _key: &str) -> Result<i64> {
        Ok(0)
    }
}
