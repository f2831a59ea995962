//! Error types for the result cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the result cache and its paging collaborator.
///
/// A missing key is never an error: lookups return `None` instead.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key is empty or exceeds the maximum key length
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Invalid caller input (paging parameters, configuration)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Value could not be serialized for size estimation or transport
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A data source failed to produce a count or a range
    #[error("Source error: {0}")]
    Source(String),
}

// == Result Type Alias ==
/// Convenience Result type for the result cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CacheError::InvalidKey("Key cannot be empty".to_string());
        assert_eq!(err.to_string(), "Invalid key: Key cannot be empty");

        let err = CacheError::Source("connection reset".to_string());
        assert_eq!(err.to_string(), "Source error: connection reset");
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err: CacheError = json_err.into();
        assert!(matches!(err, CacheError::Serialization(_)));
        assert!(err.to_string().starts_with("Serialization failed"));
    }
}
