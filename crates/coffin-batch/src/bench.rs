//! Sustained decryption throughput benchmark.
//!
//! Rounds over the same directories are repeated until the time budget is
//! spent. The budget is only checked between rounds, so the measured time
//! overshoots the target by at most one round.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::pipeline::{BatchPipeline, BatchResult};
use crate::sink::MetricsSink;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Benchmark loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchState {
    /// Rounds are still being scheduled.
    Running,
    /// The time budget has been spent.
    Done,
}

/// Repeats pipeline rounds for a fixed wall-clock budget.
#[derive(Debug)]
pub struct BenchmarkLoop<'a> {
    pipeline: &'a BatchPipeline,
    roots: Vec<PathBuf>,
    target: Duration,
}

impl<'a> BenchmarkLoop<'a> {
    /// Create a loop over `roots` lasting at least `target`.
    pub fn new(pipeline: &'a BatchPipeline, roots: Vec<PathBuf>, target: Duration) -> Self {
        Self {
            pipeline,
            roots,
            target,
        }
    }

    /// Run until the budget is spent.
    pub fn run(&self) -> BenchmarkReport {
        self.run_with(|_, _| {})
    }

    /// Run until the budget is spent, calling `on_round` after each round
    /// with the round number and the running totals.
    ///
    /// At least one round always runs.
    pub fn run_with<F>(&self, mut on_round: F) -> BenchmarkReport
    where
        F: FnMut(u64, &BatchResult),
    {
        let sink = MetricsSink::new();
        let mut totals = BatchResult::default();
        let mut rounds = 0u64;
        let mut state = BenchState::Running;

        let start = Instant::now();
        while state == BenchState::Running {
            let round = self.pipeline.run_round(&self.roots, &sink);
            totals.merge(&round);
            rounds += 1;
            on_round(rounds, &totals);

            if start.elapsed() >= self.target {
                state = BenchState::Done;
            }
        }
        let elapsed = start.elapsed();

        log::info!(
            "Benchmark finished after {} rounds in {:.2?}",
            rounds,
            elapsed
        );

        BenchmarkReport {
            rounds,
            files: sink.files(),
            bytes: sink.bytes(),
            totals,
            elapsed,
            target: self.target,
        }
    }
}

/// Aggregate benchmark results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchmarkReport {
    /// Number of completed rounds.
    pub rounds: u64,
    /// Assets decoded across all rounds.
    pub files: u64,
    /// Decoded bytes across all rounds.
    pub bytes: u64,
    /// Merged per-round counters, including failures.
    pub totals: BatchResult,
    /// Wall-clock time spent.
    pub elapsed: Duration,
    /// Requested budget.
    pub target: Duration,
}

impl BenchmarkReport {
    /// Decoded size in MiB.
    pub fn megabytes(&self) -> f64 {
        self.bytes as f64 / BYTES_PER_MB
    }

    /// Throughput in MiB per second.
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.megabytes() / secs
        } else {
            0.0
        }
    }
}
