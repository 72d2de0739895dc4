//! ttl_cache demo
//!
//! Starts a cache from environment configuration, runs a short workload,
//! then reports statistics until Ctrl+C.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttl_cache::{Cache, CacheConfig, MemoryCache};

/// Entry point for the demo.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create and start the cache
/// 4. Store a few entries with short TTLs
/// 5. Log statistics every second until Ctrl+C, then shut down
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CacheConfig::from_env();
    info!(
        "Configuration loaded: name={}, default_ttl={}s, max_entries={}, sweep_interval={}ms",
        config.name, config.default_ttl, config.max_entries, config.sweep_interval_ms
    );

    let cache = MemoryCache::with_config(config).context("invalid cache configuration")?;
    cache.startup().context("failed to start cache")?;

    cache.put_with_ttl("greeting", Arc::new("hello".to_string()), 1)?;
    cache.put_with_ttl("session", Arc::new(42_u32), 3)?;
    cache.put("config", Arc::new(vec![1_u8, 2, 3]))?;
    for _ in 0..5 {
        cache.incr("visits")?;
    }
    info!(
        "Stored demo entries; visits={:?}",
        cache.get_as::<i64>("visits").as_deref()
    );

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let stats = serde_json::to_string(&cache.stats())?;
                info!("Cache stats: {}", stats);
            }
            result = signal::ctrl_c() => {
                result.context("failed to listen for Ctrl+C")?;
                info!("Received Ctrl+C, initiating shutdown...");
                break;
            }
        }
    }

    cache.shutdown();
    info!("Shutdown complete");
    Ok(())
}
