//! Cache Module
//!
//! In-process cache store with per-entry TTL expiry and bounded reclamation
//! of payloads under capacity pressure.

mod backend;
mod entry;
mod handle;
mod index;
mod lru;
mod noop;
mod queue;
mod state;
mod stats;
mod store;


// Re-export public types
pub use backend::{downcast_value, Cache};
pub use entry::{current_timestamp_ms, CacheEntry, CacheValue};
pub use handle::{ExpiryHandle, QueueSlot};
pub use index::KeyIndex;
pub use lru::LruTracker;
pub use noop::NoopCache;
pub use queue::ExpiryQueue;
pub use state::{CacheState, SweepReport};
pub use stats::CacheStats;
pub use store::MemoryCache;
