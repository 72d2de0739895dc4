//! ttl_cache - An in-process cache store
//!
//! Values keyed by string with per-entry TTL expiry, a background sweeper,
//! and bounded reclamation of payloads under capacity pressure.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheStats, CacheValue, MemoryCache, NoopCache};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
