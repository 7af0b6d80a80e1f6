//! Parallel batch decryption using rayon.
//!
//! A round discovers containers under a set of roots, decodes them on a
//! bounded worker pool and hands each result to an [`OutputSink`]. Every job
//! is isolated: an unreadable file, a corrupt header or a panicking sink
//! is logged and counted without affecting its siblings. The round returns
//! only after every job has finished.

use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use glob::Pattern;
use rayon::prelude::*;

use crate::config::PipelineConfig;
use crate::discover::{self, Discovery, Job};
use crate::sink::OutputSink;
use crate::{Error, Result};

/// Counters for one round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchResult {
    /// Jobs dispatched.
    pub attempted: u64,
    /// Jobs decoded and accepted by the sink.
    pub succeeded: u64,
    /// Jobs that failed to read, decode or write.
    pub failed: u64,
    /// Jobs that were not K9A containers.
    pub skipped: u64,
    /// Decoded bytes handed to the sink.
    pub bytes: u64,
    /// Roots that did not exist.
    pub missing_roots: u64,
    /// Directory entries that could not be read during discovery.
    pub walk_errors: u64,
}

impl BatchResult {
    /// Add another round's counters to this one.
    pub fn merge(&mut self, other: &BatchResult) {
        self.attempted += other.attempted;
        self.succeeded += other.succeeded;
        self.failed += other.failed;
        self.skipped += other.skipped;
        self.bytes += other.bytes;
        self.missing_roots += other.missing_roots;
        self.walk_errors += other.walk_errors;
    }

    /// Check if every dispatched job succeeded and discovery saw every entry.
    pub fn is_complete(&self) -> bool {
        self.failed == 0
            && self.walk_errors == 0
            && self.succeeded + self.skipped == self.attempted
    }
}

/// Lock-free counters shared by the workers of one round.
#[derive(Debug, Default)]
struct RoundCounters {
    attempted: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    skipped: AtomicU64,
    bytes: AtomicU64,
}

impl RoundCounters {
    fn snapshot(&self, discovery: &Discovery) -> BatchResult {
        BatchResult {
            attempted: self.attempted.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            bytes: self.bytes.load(Ordering::Relaxed),
            missing_roots: discovery.missing_roots.len() as u64,
            walk_errors: discovery.walk_errors as u64,
        }
    }
}

/// Bounded-parallelism container processor.
pub struct BatchPipeline {
    pattern: Pattern,
    pool: rayon::ThreadPool,
}

impl BatchPipeline {
    /// Build a pipeline and its worker pool.
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        let pattern = config.pattern()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers.max(1))
            .thread_name(|i| format!("coffin-worker-{i}"))
            .build()?;

        Ok(Self { pattern, pool })
    }

    /// Size of the worker pool.
    #[inline]
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Find the files a round over `roots` would process.
    pub fn discover(&self, roots: &[PathBuf]) -> Discovery {
        discover::discover(roots, &self.pattern)
    }

    /// Run one round over `roots`.
    pub fn run_round<S>(&self, roots: &[PathBuf], sink: &S) -> BatchResult
    where
        S: OutputSink + ?Sized,
    {
        let discovery = self.discover(roots);
        self.run_jobs(&discovery, sink, |_| {})
    }

    /// Run one round over already discovered jobs.
    ///
    /// `progress` is called from the workers once per finished job with the
    /// number of jobs finished so far.
    pub fn run_jobs<S, F>(&self, discovery: &Discovery, sink: &S, progress: F) -> BatchResult
    where
        S: OutputSink + ?Sized,
        F: Fn(u64) + Sync,
    {
        let counters = RoundCounters::default();
        let done = AtomicU64::new(0);

        self.pool.install(|| {
            discovery.jobs.par_iter().for_each(|job| {
                counters.attempted.fetch_add(1, Ordering::Relaxed);

                let outcome = panic::catch_unwind(AssertUnwindSafe(|| process_job(job, sink)))
                    .unwrap_or_else(|payload| Err(Error::Panicked(panic_message(payload))));

                match outcome {
                    Ok(bytes) => {
                        counters.succeeded.fetch_add(1, Ordering::Relaxed);
                        counters.bytes.fetch_add(bytes, Ordering::Relaxed);
                    }
                    Err(e) if e.is_skip() => {
                        log::debug!("Not a K9A container, skipping: {}", job.source.display());
                        counters.skipped.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(e) => {
                        log::warn!("Decryption failed for {}: {}", job.source.display(), e);
                        counters.failed.fetch_add(1, Ordering::Relaxed);
                    }
                }

                progress(done.fetch_add(1, Ordering::Relaxed) + 1);
            });
        });

        let result = counters.snapshot(discovery);
        log::debug!(
            "Round finished: {} ok, {} failed, {} skipped, {} unreadable, {} bytes",
            result.succeeded,
            result.failed,
            result.skipped,
            result.walk_errors,
            result.bytes
        );
        result
    }
}

impl std::fmt::Debug for BatchPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchPipeline")
            .field("pattern", &self.pattern.as_str())
            .field("workers", &self.workers())
            .finish()
    }
}

/// Read, decode and deliver one container. Returns the decoded size.
fn process_job<S>(job: &Job, sink: &S) -> Result<u64>
where
    S: OutputSink + ?Sized,
{
    let data = fs::read(&job.source).map_err(|e| Error::io(&job.source, e))?;
    let asset = coffin_k9a::decode_owned(data, &job.source)?;
    sink.accept(job, &asset)?;
    Ok(asset.len() as u64)
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
