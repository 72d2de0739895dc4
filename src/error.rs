//! Error types for the cache store
//!
//! Every variant is a precondition violation; nothing here is retried.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key was empty on an operation that requires one
    #[error("Cache key must not be empty")]
    NullKey,

    /// Argument outside the accepted range
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Stored value does not support the requested operation
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// Backend does not implement the requested operation
    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),

    /// Background tasks need a Tokio runtime to run on
    #[error("No Tokio runtime available to start the sweeper")]
    NoRuntime,
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(CacheError::NullKey.to_string(), "Cache key must not be empty");
        assert_eq!(
            CacheError::InvalidArgument("ttl".to_string()).to_string(),
            "Invalid argument: ttl"
        );
        assert_eq!(
            CacheError::Unsupported("put_with_ttl").to_string(),
            "Unsupported operation: put_with_ttl"
        );
    }
}
