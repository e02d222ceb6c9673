//! Error types for zerohttpd
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using ZeroError
pub type Result<T> = std::result::Result<T, ZeroError>;

/// Unified error type for zerohttpd operations
#[derive(Debug, Error)]
pub enum ZeroError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // HTTP Errors
    // -------------------------------------------------------------------------
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A line or header did not fit in its buffer
    #[error("{what} exceeds capacity of {limit} bytes")]
    Capacity { what: &'static str, limit: usize },

    /// The file shrank between stat and send; the declared Content-Length was not honored
    #[error("Short body: declared {expected} bytes, sent {sent}")]
    ShortBody { expected: u64, sent: u64 },

    #[error("Template error: {0}")]
    Template(String),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Store unavailable: {0}")]
    Store(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ZeroError {
    /// True for faults raised before anything was written to the client,
    /// where a 500 response can still be sent.
    pub fn is_pre_response(&self) -> bool {
        matches!(self, ZeroError::Capacity { .. } | ZeroError::Template(_))
    }
}
