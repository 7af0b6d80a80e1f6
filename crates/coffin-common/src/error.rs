//! Error types for coffin-common.

use thiserror::Error;

/// Common error type for Coffin operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// End of buffer reached while reading.
    #[error("unexpected end of buffer: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
