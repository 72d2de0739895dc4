//! Cache Store Module
//!
//! `MemoryCache` is the in-process backend: a single lock guards the key
//! index and expiry queue, and a background sweeper drains expired entries
//! once the cache is started.

use std::any::Any;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::{debug, info};

use crate::cache::{
    current_timestamp_ms, downcast_value, Cache, CacheStats, CacheState, CacheValue, SweepReport,
};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_shutdown_hook, spawn_sweeper, SweeperHandle};

// == Memory Cache ==
/// In-process TTL cache.
///
/// Share it between threads behind an `Arc`. Dropping the cache stops its
/// background tasks.
#[derive(Debug)]
pub struct MemoryCache {
    config: CacheConfig,
    state: Arc<Mutex<CacheState>>,
    sweeper: Mutex<Option<SweeperHandle>>,
}

impl MemoryCache {
    // == Constructor ==
    /// Creates a cache with the given name and default TTL in seconds.
    ///
    /// Other settings come from `CacheConfig::default()`.
    pub fn new(name: impl Into<String>, default_ttl: i64) -> Result<Self> {
        Self::with_config(CacheConfig::new(name, default_ttl))
    }

    /// Creates a cache from an explicit configuration.
    ///
    /// Fails with `InvalidArgument` if the config has a zero default TTL or
    /// sweep interval.
    pub fn with_config(config: CacheConfig) -> Result<Self> {
        config.validate()?;
        let state = CacheState::new(config.default_ttl, config.max_entries);
        debug!(
            cache = %config.name,
            default_ttl = config.default_ttl,
            max_entries = config.max_entries,
            "Cache store created"
        );

        Ok(Self {
            config,
            state: Arc::new(Mutex::new(state)),
            sweeper: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // == Typed Get ==
    /// Returns the stored value as `T`, or None if absent or of another type.
    pub fn get_as<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        self.get(key).and_then(downcast_value)
    }

    pub fn default_ttl(&self) -> i64 {
        self.state.lock().default_ttl()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.state.lock().stats()
    }

    /// Number of keys currently holding a payload.
    pub fn len(&self) -> usize {
        self.state.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().is_empty()
    }

    /// Whether the background sweeper is running.
    pub fn is_running(&self) -> bool {
        self.sweeper
            .lock()
            .as_ref()
            .is_some_and(SweeperHandle::is_running)
    }

    // == Sweep Now ==
    /// Runs one sweep tick on the calling thread.
    pub fn sweep_now(&self) -> SweepReport {
        self.state
            .lock()
            .sweep(current_timestamp_ms(), self.config.expiry_margin_ms)
    }
}

impl Cache for MemoryCache {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn put(&self, key: &str, value: CacheValue) -> Result<()> {
        self.put_with_ttl(key, value, 0)
    }

    fn put_with_ttl(&self, key: &str, value: CacheValue, ttl_secs: i64) -> Result<()> {
        self.state.lock().put(key, value, ttl_secs)
    }

    fn get(&self, key: &str) -> Option<CacheValue> {
        self.state.lock().get(key, current_timestamp_ms())
    }

    fn evict(&self, key: &str) -> Result<()> {
        self.state.lock().evict(key)
    }

    fn clear(&self) {
        self.state.lock().clear();
    }

    fn incr(&self, key: &str) -> Result<i64> {
        self.incr_with_ttl(key, 0)
    }

    fn incr_with_ttl(&self, key: &str, ttl_secs: i64) -> Result<i64> {
        self.state
            .lock()
            .add(key, 1, ttl_secs, current_timestamp_ms())
    }

    fn decr(&self, key: &str) -> Result<i64> {
        self.decr_with_ttl(key, 0)
    }

    fn decr_with_ttl(&self, key: &str, ttl_secs: i64) -> Result<i64> {
        self.state
            .lock()
            .add(key, -1, ttl_secs, current_timestamp_ms())
    }

    fn set_default_ttl(&self, ttl_secs: i64) -> Result<()> {
        self.state.lock().set_default_ttl(ttl_secs)
    }

    // == Startup ==
    /// Starts the sweeper, and the Ctrl+C hook if configured, on the current
    /// Tokio runtime. Does nothing while a sweeper is already running.
    fn startup(&self) -> Result<()> {
        let mut slot = self.sweeper.lock();
        if slot.as_ref().is_some_and(SweeperHandle::is_running) {
            return Ok(());
        }
        let runtime = Handle::try_current().map_err(|_| CacheError::NoRuntime)?;

        // A hook may still be waiting after its sweeper ended
        if let Some(previous) = slot.take() {
            previous.stop();
        }

        let sweeper = spawn_sweeper(
            &runtime,
            self.config.name.clone(),
            Arc::downgrade(&self.state),
            self.config.sweep_interval(),
            self.config.expiry_margin_ms,
        );
        let hook = self.config.shutdown_hook.then(|| {
            spawn_shutdown_hook(
                &runtime,
                self.config.name.clone(),
                Arc::downgrade(&self.state),
                sweeper.abort_handle(),
            )
        });
        *slot = Some(SweeperHandle::new(sweeper, hook));

        info!(cache = %self.config.name, "Cache started");
        Ok(())
    }

    // == Shutdown ==
    fn shutdown(&self) {
        self.state.lock().clear();
        if let Some(handle) = self.sweeper.lock().take() {
            handle.stop();
            info!(cache = %self.config.name, "Cache shut down");
        }
    }
}

impl Drop for MemoryCache {
    fn drop(&mut self) {
        if let Some(handle) = self.sweeper.get_mut().take() {
            handle.stop();
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_cache() -> MemoryCache {
        MemoryCache::with_config(CacheConfig::new("test", 300).with_sweep_interval_ms(20))
            .unwrap()
    }

    #[test]
    fn test_store_new() {
        let cache = MemoryCache::new("users", 60).unwrap();
        assert_eq!(cache.name(), "users");
        assert_eq!(cache.default_ttl(), 60);
        assert!(cache.is_empty());
        assert!(!cache.is_running());
    }

    #[test]
    fn test_store_new_rejects_zero_ttl() {
        assert!(matches!(
            MemoryCache::new("users", 0),
            Err(CacheError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_store_put_and_get_as() {
        let cache = test_cache();

        cache.put("key1", Arc::new("value1".to_string())).unwrap();

        assert_eq!(
            cache.get_as::<String>("key1").as_deref(),
            Some(&"value1".to_string())
        );
        assert!(cache.get_as::<i64>("key1").is_none(), "Wrong type reads as absent");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_store_evict() {
        let cache = test_cache();

        cache.put("key1", Arc::new(1_i64)).unwrap();
        cache.evict("key1").unwrap();

        assert!(cache.get("key1").is_none());
        assert_eq!(cache.evict(""), Err(CacheError::NullKey));
    }

    #[test]
    fn test_store_incr_decr() {
        let cache = test_cache();

        assert_eq!(cache.incr("hits"), Ok(0));
        assert_eq!(cache.get_as::<i64>("hits").as_deref(), Some(&1));
        assert_eq!(cache.incr("hits"), Ok(1));
        assert_eq!(cache.get_as::<i64>("hits").as_deref(), Some(&2));
        assert_eq!(cache.decr_with_ttl("hits", 10), Ok(2));
        assert_eq!(cache.decr("fresh"), Ok(0));
        assert_eq!(cache.get_as::<i64>("fresh").as_deref(), Some(&-1));
    }

    #[test]
    fn test_store_stats() {
        let cache = test_cache();

        cache.put("key1", Arc::new(1_i64)).unwrap();
        cache.get("key1"); // hit
        cache.get("nonexistent"); // miss

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.live_entries, 1);
        assert_eq!(stats.queued_handles, 1);
    }

    #[test]
    fn test_startup_outside_runtime_fails() {
        let cache = test_cache();
        assert_eq!(cache.startup(), Err(CacheError::NoRuntime));
        assert!(!cache.is_running());
    }

    #[test]
    fn test_startup_on_blocking_runtime() {
        let cache = test_cache();

        tokio_test::block_on(async {
            cache.startup().unwrap();
            assert!(cache.is_running());
            cache.shutdown();
        });
        assert!(!cache.is_running());
    }

    #[tokio::test]
    async fn test_startup_is_idempotent() {
        let cache = test_cache();

        cache.startup().unwrap();
        cache.startup().unwrap();
        assert!(cache.is_running());

        cache.shutdown();
        cache.shutdown();
        assert!(!cache.is_running());
    }

    #[tokio::test]
    async fn test_startup_after_shutdown_restarts_sweeper() {
        let cache = test_cache();
        cache.startup().unwrap();
        cache.shutdown();

        cache.startup().unwrap();
        assert!(cache.is_running());

        cache.put_with_ttl("short", Arc::new(1_i64), 1).unwrap();
        tokio::time::sleep(Duration::from_millis(1200)).await;

        assert_eq!(cache.stats().expirations, 1);
        assert!(cache.get("short").is_none());
        cache.shutdown();
    }

    #[tokio::test]
    async fn test_shutdown_clears_store() {
        let cache = test_cache();
        cache.startup().unwrap();
        cache.put("a", Arc::new(1_i64)).unwrap();

        cache.shutdown();

        assert!(cache.get("a").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_sweep_now() {
        let cache = test_cache();
        cache.put("a", Arc::new(1_i64)).unwrap();
        cache.evict("a").unwrap();

        assert_eq!(cache.sweep_now().stale, 1);
    }
}
