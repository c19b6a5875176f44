//! Error types for cordkv
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using CordError
pub type Result<T> = std::result::Result<T, CordError>;

/// Unified error type for cordkv operations
#[derive(Debug, Error)]
pub enum CordError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Log Errors
    // -------------------------------------------------------------------------
    #[error("log corruption detected: {0}")]
    Corrupt(String),

    #[error("frame too large: {size} bytes (max {max})")]
    FrameTooLarge {
        /// Total framed size that was requested.
        size: usize,
        /// Largest framed size the length prefix can express.
        max: usize,
    },

    // -------------------------------------------------------------------------
    // Index Errors
    // -------------------------------------------------------------------------
    #[error("key not found")]
    KeyNotFound,

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("codec error: {0}")]
    Codec(String),

    // -------------------------------------------------------------------------
    // Shell Errors
    // -------------------------------------------------------------------------
    #[error("{0}")]
    Query(String),
}
