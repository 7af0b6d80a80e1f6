//! Error types for batch processing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while processing containers in bulk.
///
/// Within a round these are contained per job or per root; only
/// construction of a pipeline can surface one to the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error on a specific path.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Container decode error.
    #[error("{0}")]
    Decode(#[from] coffin_k9a::Error),

    /// A configured root does not exist or is not a directory.
    #[error("directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// The recovered extension cannot form a file name.
    #[error("invalid extension {extension:?} recovered from {}", .source_path.display())]
    InvalidDestination {
        source_path: PathBuf,
        extension: String,
    },

    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Invalid file filter.
    #[error("invalid file filter: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Worker pool could not be started.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// A job panicked.
    #[error("job panicked: {0}")]
    Panicked(String),
}

impl Error {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means the file was skipped rather than failed.
    pub fn is_skip(&self) -> bool {
        matches!(self, Error::Decode(e) if e.is_skip())
    }
}

/// Result type for batch operations.
pub type Result<T> = std::result::Result<T, Error>;
