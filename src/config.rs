//! Configuration Module
//!
//! Construction parameters for a cache store. A `CacheConfig` is passed
//! explicitly to `MemoryCache::with_config`; nothing here is process-global.

use std::env;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Cache store configuration parameters.
///
/// All values can be loaded from environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Name of the cache, used in log output
    pub name: String,
    /// Default TTL in seconds for entries put without an explicit TTL.
    /// Negative means entries never expire; zero is rejected.
    pub default_ttl: i64,
    /// Maximum number of live payloads before the least recently used one is
    /// reclaimed. Zero disables the cap.
    pub max_entries: usize,
    /// Period of the background sweeper in milliseconds
    pub sweep_interval_ms: u64,
    /// Entries expiring within this many milliseconds are swept early
    pub expiry_margin_ms: u64,
    /// Whether `startup` registers a Ctrl+C hook that shuts the cache down.
    /// Off by default: the hook takes over SIGINT, so the host process no
    /// longer exits on Ctrl+C.
    pub shutdown_hook: bool,
}

impl CacheConfig {
    /// Creates a config with the given name and default TTL, other fields defaulted.
    pub fn new(name: impl Into<String>, default_ttl: i64) -> Self {
        Self {
            name: name.into(),
            default_ttl,
            ..Self::default()
        }
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_NAME` - Cache name (default: "default")
    /// - `CACHE_DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `CACHE_MAX_ENTRIES` - Live payload cap, 0 = unbounded (default: 10000)
    /// - `CACHE_SWEEP_INTERVAL_MS` - Sweeper period (default: 100)
    /// - `CACHE_EXPIRY_MARGIN_MS` - Early expiry margin (default: 50)
    /// - `CACHE_SHUTDOWN_HOOK` - Register Ctrl+C hook (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            name: env::var("CACHE_NAME").unwrap_or(defaults.name),
            default_ttl: parse_var("CACHE_DEFAULT_TTL").unwrap_or(defaults.default_ttl),
            max_entries: parse_var("CACHE_MAX_ENTRIES").unwrap_or(defaults.max_entries),
            sweep_interval_ms: parse_var("CACHE_SWEEP_INTERVAL_MS")
                .unwrap_or(defaults.sweep_interval_ms),
            expiry_margin_ms: parse_var("CACHE_EXPIRY_MARGIN_MS")
                .unwrap_or(defaults.expiry_margin_ms),
            shutdown_hook: parse_var("CACHE_SHUTDOWN_HOOK").unwrap_or(defaults.shutdown_hook),
        }
    }

    // == Builders ==
    /// Sets the live payload cap.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Sets the sweeper period in milliseconds.
    pub fn with_sweep_interval_ms(mut self, interval_ms: u64) -> Self {
        self.sweep_interval_ms = interval_ms;
        self
    }

    /// Enables or disables the Ctrl+C shutdown hook.
    ///
    /// Only enable it when the host has no signal handling of its own. Once
    /// registered, Ctrl+C clears the cache instead of ending the process.
    pub fn with_shutdown_hook(mut self, enabled: bool) -> Self {
        self.shutdown_hook = enabled;
        self
    }

    // == Validate ==
    /// Rejects a zero default TTL or a zero sweep interval.
    pub fn validate(&self) -> Result<()> {
        if self.default_ttl == 0 {
            return Err(CacheError::InvalidArgument(
                "default TTL must not be 0".to_string(),
            ));
        }
        if self.sweep_interval_ms == 0 {
            return Err(CacheError::InvalidArgument(
                "sweep interval must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Sweeper period as a `Duration`.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            default_ttl: 300,
            max_entries: 10_000,
            sweep_interval_ms: 100,
            expiry_margin_ms: 50,
            shutdown_hook: false,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.name, "default");
        assert_eq!(config.default_ttl, 300);
        assert_eq!(config.max_entries, 10_000);
        assert_eq!(config.sweep_interval_ms, 100);
        assert_eq!(config.expiry_margin_ms, 50);
        assert!(!config.shutdown_hook, "Hook is opt-in");
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("CACHE_NAME");
        env::remove_var("CACHE_DEFAULT_TTL");
        env::remove_var("CACHE_MAX_ENTRIES");
        env::remove_var("CACHE_SWEEP_INTERVAL_MS");
        env::remove_var("CACHE_EXPIRY_MARGIN_MS");
        env::remove_var("CACHE_SHUTDOWN_HOOK");

        assert_eq!(CacheConfig::from_env(), CacheConfig::default());
    }

    #[test]
    fn test_config_builders() {
        let config = CacheConfig::new("sessions", 60)
            .with_max_entries(5)
            .with_sweep_interval_ms(20)
            .with_shutdown_hook(true);

        assert_eq!(config.name, "sessions");
        assert_eq!(config.default_ttl, 60);
        assert_eq!(config.max_entries, 5);
        assert_eq!(config.sweep_interval(), Duration::from_millis(20));
        assert!(config.shutdown_hook);
    }

    #[test]
    fn test_config_validate() {
        assert!(CacheConfig::new("a", 10).validate().is_ok());
        assert!(CacheConfig::new("a", -1).validate().is_ok());
        assert!(matches!(
            CacheConfig::new("a", 0).validate(),
            Err(CacheError::InvalidArgument(_))
        ));
        assert!(matches!(
            CacheConfig::new("a", 10).with_sweep_interval_ms(0).validate(),
            Err(CacheError::InvalidArgument(_))
        ));
    }
}
