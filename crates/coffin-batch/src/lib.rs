//! Parallel K9A batch decryption.
//!
//! This crate drives [`coffin_k9a`] over whole asset directories:
//!
//! - [`discover`] - Recursive container discovery under one or more roots
//! - [`BatchPipeline`] - Bounded rayon worker pool with per-file failure isolation
//! - [`OutputSink`] - Where decoded assets go ([`WriterSink`], [`MetricsSink`])
//! - [`BenchmarkLoop`] - Repeated rounds for a fixed wall-clock budget
//!
//! # Example
//!
//! ```no_run
//! use coffin_batch::{default_roots, BatchPipeline, PipelineConfig, WriterSink};
//!
//! let game = std::env::current_dir()?;
//! let pipeline = BatchPipeline::new(&PipelineConfig::default())?;
//! let sink = WriterSink::new(&game, game.join("decrypted"));
//!
//! let result = pipeline.run_round(&default_roots(&game), &sink);
//! println!("{} decrypted, {} failed", result.succeeded, result.failed);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod bench;
mod config;
mod error;
mod pipeline;
mod sink;

pub mod discover;

pub use bench::{BenchState, BenchmarkLoop, BenchmarkReport};
pub use config::{
    default_roots, default_workers, is_game_directory, PipelineConfig, DEFAULT_BENCH_SECS,
    DEFAULT_OUTPUT_DIR, DEFAULT_ROOTS, GAME_EXECUTABLES,
};
pub use discover::{Discovery, Job};
pub use error::{Error, Result};
pub use pipeline::{BatchPipeline, BatchResult};
pub use sink::{MetricsSink, OutputSink, WriterSink};
