//! Pipeline configuration and game directory conventions.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::Result;

/// Asset directories scanned when no input is given, relative to the game root.
pub const DEFAULT_ROOTS: [&str; 3] = ["www/img", "www/audio", "www/data"];

/// Output directory used when no output is given.
pub const DEFAULT_OUTPUT_DIR: &str = "decrypted";

/// Default benchmark window in seconds.
pub const DEFAULT_BENCH_SECS: u64 = 10;

/// Executables whose presence marks a game root.
pub const GAME_EXECUTABLES: [&str; 2] = ["Game.exe", "nw.exe"];

/// Number of workers used when none is configured.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Resolve [`DEFAULT_ROOTS`] against a game root.
pub fn default_roots(game_dir: &Path) -> Vec<PathBuf> {
    DEFAULT_ROOTS
        .iter()
        .map(|root| game_dir.join(root))
        .collect()
}

/// Check whether `dir` looks like a game root.
pub fn is_game_directory(dir: &Path) -> bool {
    GAME_EXECUTABLES.iter().any(|exe| dir.join(exe).is_file())
}

/// Batch pipeline settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Glob matched against file names during discovery.
    pub filter: String,
    /// Size of the worker pool.
    pub workers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            filter: coffin_k9a::CONTAINER_GLOB.to_string(),
            workers: default_workers(),
        }
    }
}

impl PipelineConfig {
    /// Set the worker count. Zero falls back to [`default_workers`].
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = if workers == 0 { default_workers() } else { workers };
        self
    }

    /// Set the file name filter.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Compile the file name filter.
    pub fn pattern(&self) -> Result<Pattern> {
        Ok(Pattern::new(&self.filter)?)
    }
}
