//! Error types for SmartStore
//!
//! This module defines the error types used throughout the SmartStore system.
//! All errors are designed to be user-friendly and provide clear context
//! about what went wrong and how to fix it.

use thiserror::Error;

/// SmartStore error types
#[derive(Debug, Error)]
pub enum SmartStoreError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Resource already exists
    #[error("Resource already exists: {0}")]
    AlreadyExists(String),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

/// Result type for SmartStore operations
pub type Result<T> = std::result::Result<T, SmartStoreError>;

impl From<serde_json::Error> for SmartStoreError {
    fn from(err: serde_json::Error) -> Self {
        SmartStoreError::Serialization(err.to_string())
    }
}

impl From<String> for SmartStoreError {
    fn from(err: String) -> Self {
        SmartStoreError::Other(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_error_display() {
        let err = SmartStoreError::Config("test".to_string());
        assert_eq!(err.to_string(), "Configuration error: test");

        let err = SmartStoreError::Serialization("test".to_string());
        assert_eq!(err.to_string(), "Serialization error: test");

        let err = SmartStoreError::NotFound("test".to_string());
        assert_eq!(err.to_string(), "Resource not found: test");

        let err = SmartStoreError::AlreadyExists("test".to_string());
        assert_eq!(err.to_string(), "Resource already exists: test");

        let err = SmartStoreError::Other("test".to_string());
        assert_eq!(err.to_string(), "Error: test");
    }

    #[test]
    fn test_error_conversion_from_serde() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: SmartStoreError = json_err.into();
        assert!(err.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_error_conversion_from_string() {
        let err: SmartStoreError = "test".to_string().into();
        assert_eq!(err.to_string(), "Error: test");
    }
}
