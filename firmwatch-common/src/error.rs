//! Common error types for firmwatch

use thiserror::Error;

/// Common result type for firmwatch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Run-level error types shared across the pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// Ledger storage error (wraps sqlx::Error)
    #[error("Ledger storage error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File discovery failed at the scan root
    #[error("Discovery error: {0}")]
    Discovery(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
