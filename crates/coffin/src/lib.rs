//! Coffin - K9A game asset decryption and benchmarking library.
//!
//! This crate provides a unified interface to the Coffin library crates.
//!
//! # Crates
//!
//! - [`coffin_common`] - Common utilities (bounds-checked binary reading)
//! - [`coffin_k9a`] - K9A container parsing and the rolling XOR cipher
//! - [`coffin_batch`] - Parallel batch decryption and the throughput benchmark
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use coffin::prelude::*;
//!
//! let game = std::env::current_dir()?;
//! let pipeline = BatchPipeline::new(&PipelineConfig::default())?;
//!
//! let report = BenchmarkLoop::new(&pipeline, default_roots(&game), Duration::from_secs(5)).run();
//! println!("{:.2} MB/s", report.throughput());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use coffin_batch as batch;
pub use coffin_common as common;
pub use coffin_k9a as k9a;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use coffin_batch::{
        default_roots, is_game_directory, BatchPipeline, BatchResult, BenchmarkLoop,
        BenchmarkReport, MetricsSink, OutputSink, PipelineConfig, WriterSink,
    };
    pub use coffin_common::BinaryReader;
    pub use coffin_k9a::{decode, decode_owned, encode, K9aHeader, Plaintext};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
