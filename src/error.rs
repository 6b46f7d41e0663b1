//! Error types for the feedback analyzer
//!
//! This module provides structured error definitions using thiserror, with
//! conversions from the storage, configuration and serialization layers.

use thiserror::Error;

/// Main error type for feedback analyzer operations
#[derive(Error, Debug)]
pub enum FeedbackError {
    /// Persistence unavailable or write failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Sentiment model backend failure
    #[error("Classifier error: {0}")]
    Classifier(String),

    /// Invalid caller input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for feedback analyzer operations
pub type Result<T> = std::result::Result<T, FeedbackError>;

impl From<rusqlite::Error> for FeedbackError {
    fn from(err: rusqlite::Error) -> Self {
        FeedbackError::Storage(err.to_string())
    }
}

impl From<deadpool_sqlite::PoolError> for FeedbackError {
    fn from(err: deadpool_sqlite::PoolError) -> Self {
        FeedbackError::Storage(format!("Failed to get connection from pool: {}", err))
    }
}

impl From<deadpool_sqlite::InteractError> for FeedbackError {
    fn from(err: deadpool_sqlite::InteractError) -> Self {
        FeedbackError::Storage(format!("Pool interaction failed: {}", err))
    }
}

/// Convert anyhow::Error to FeedbackError
impl From<anyhow::Error> for FeedbackError {
    fn from(err: anyhow::Error) -> Self {
        FeedbackError::Other(err.to_string())
    }
}
