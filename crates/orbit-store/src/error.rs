//! Store error types.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Driver(#[from] mongodb::error::Error),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),
}

impl StoreError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Config(_) => "config",
            StoreError::Driver(_) => "driver",
            StoreError::DuplicateKey(_) => "duplicate_key",
        }
    }
}
