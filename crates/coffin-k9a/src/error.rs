//! Error types for the K9A crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when decoding or encoding K9A containers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Common library error.
    #[error("{0}")]
    Common(#[from] coffin_common::Error),

    /// The buffer is too short to hold the header it declares.
    #[error("malformed K9A header: need at least {needed} bytes, got {available}")]
    MalformedHeader { needed: usize, available: usize },

    /// The declared payload length runs past the end of the ciphertext.
    #[error("declared payload length {declared} exceeds ciphertext length {available}")]
    PayloadOverrun { declared: usize, available: usize },

    /// The source path is not a `.k9a` container.
    #[error("not a K9A container: {}", .0.display())]
    NotApplicable(PathBuf),

    /// The extension cannot be stored in a K9A header.
    #[error("invalid extension {0:?}: must be ASCII and at most 255 bytes")]
    InvalidExtension(String),
}

impl Error {
    /// Whether this error means "skip the file" rather than "the file is bad".
    #[inline]
    pub fn is_skip(&self) -> bool {
        matches!(self, Error::NotApplicable(_))
    }
}

/// Result type for K9A operations.
pub type Result<T> = std::result::Result<T, Error>;
