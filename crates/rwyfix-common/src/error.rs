//! Error types for rwyfix-common.

use thiserror::Error;

/// Common error type for byte-source operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A read or write span lies outside the backing stream.
    #[error("span out of bounds: {len} bytes at offset {offset:#x}")]
    OutOfBounds { offset: u64, len: usize },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
