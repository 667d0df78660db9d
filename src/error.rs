//! Error types for simfs
//!
//! Provides a unified error type for all volume operations.

use thiserror::Error;

/// Result type alias using FsError
pub type Result<T> = std::result::Result<T, FsError>;

/// Unified error type for simfs operations
#[derive(Debug, Error)]
pub enum FsError {
    // -------------------------------------------------------------------------
    // Caller Errors
    // -------------------------------------------------------------------------
    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("File not found: '{0}'")]
    NotFound(String),

    #[error("File already exists: '{0}'")]
    AlreadyExists(String),

    #[error("File table is full (max {max} files)")]
    CapacityExceeded { max: usize },

    /// No contiguous free span is large enough. Running `defragment` may help.
    #[error("No contiguous free space for {requested} bytes (try defragmenting)")]
    OutOfSpace { requested: u64 },

    #[error("Offset {offset} is outside file of {size} bytes")]
    RangeError { offset: u64, size: u64 },

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Format Errors
    // -------------------------------------------------------------------------
    #[error("Metadata corruption detected: {0}")]
    Corruption(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<bincode::Error> for FsError {
    fn from(err: bincode::Error) -> Self {
        FsError::Serialization(err.to_string())
    }
}
