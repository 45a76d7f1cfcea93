//! Error types for cache operations
//!
//! Tier lookups and stores never surface these: transient I/O failures and
//! inconsistent metadata collapse to a cache miss or a skipped store. The
//! variants below cover construction, configuration misuse and the speech
//! synthesis collaborator.

use thiserror::Error;

/// Main error type for the audio cache
#[derive(Error, Debug)]
pub enum CacheError {
    /// A tier name that is not `hot`, `disk`, `memory` or `all`
    #[error("Unknown cache tier: {0} (expected hot, disk, memory or all)")]
    UnknownTier(String),

    /// Invalid cache limits or paths
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Filesystem error while setting up the disk tier
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization/Deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The speech synthesizer failed to produce audio
    #[error("Synthesis error: {0}")]
    SynthesisError(String),

    /// Generic error with context
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

impl From<String> for CacheError {
    fn from(s: String) -> Self {
        CacheError::Other(s)
    }
}

impl From<&str> for CacheError {
    fn from(s: &str) -> Self {
        CacheError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(e: serde_json::Error) -> Self {
        CacheError::SerializationError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = CacheError::UnknownTier("ssd".to_string());
        assert_eq!(
            error.to_string(),
            "Unknown cache tier: ssd (expected hot, disk, memory or all)"
        );

        let config_error = CacheError::ConfigError("max_items must be greater than 0".into());
        assert!(config_error.to_string().contains("max_items"));
    }

    #[test]
    fn test_error_conversion() {
        let error: CacheError = "test error".into();
        assert!(matches!(error, CacheError::Other(_)));

        let error: CacheError = "test error".to_string().into();
        assert!(matches!(error, CacheError::Other(_)));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error: CacheError = io.into();
        assert!(matches!(error, CacheError::IoError(_)));
    }
}
