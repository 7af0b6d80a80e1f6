//! Destinations for decoded assets.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use coffin_k9a::Plaintext;

use crate::discover::Job;
use crate::{Error, Result};

/// Receives every successfully decoded asset of a round.
///
/// Called concurrently from pool workers. Skipped and failed containers never
/// reach the sink.
pub trait OutputSink: Sync {
    /// Handle one decoded asset.
    fn accept(&self, job: &Job, asset: &Plaintext) -> Result<()>;
}

/// Writes decoded assets under an output directory.
///
/// The container's path relative to the input root is re-rooted under the
/// output root and its extension replaced with the recovered one:
/// `<input>/www/img/Title.k9a` becomes `<output>/www/img/Title.png`.
#[derive(Debug, Clone)]
pub struct WriterSink {
    input_root: PathBuf,
    output_root: PathBuf,
}

impl WriterSink {
    /// Create a writer mirroring `input_root` into `output_root`.
    pub fn new(input_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            input_root: input_root.into(),
            output_root: output_root.into(),
        }
    }

    /// Output directory.
    #[inline]
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Where the decoded asset for `job` is written.
    ///
    /// Fails with [`Error::InvalidDestination`] when the recovered extension
    /// contains a path separator.
    pub fn destination(&self, job: &Job, extension: &str) -> Result<PathBuf> {
        if extension.chars().any(std::path::is_separator) {
            return Err(Error::InvalidDestination {
                source_path: job.source.clone(),
                extension: extension.to_string(),
            });
        }

        let relative = job
            .source
            .strip_prefix(&self.input_root)
            .ok()
            .filter(|rel| !rel.as_os_str().is_empty())
            .unwrap_or_else(|| job.relative_path());

        // An empty extension drops the suffix entirely ("Title", not "Title.").
        Ok(self.output_root.join(relative).with_extension(extension))
    }
}

impl OutputSink for WriterSink {
    fn accept(&self, job: &Job, asset: &Plaintext) -> Result<()> {
        let output_path = self.destination(job, &asset.extension)?;

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        fs::write(&output_path, &asset.bytes).map_err(|e| Error::io(&output_path, e))?;
        log::debug!("Decrypted {} -> {}", job.source.display(), output_path.display());

        Ok(())
    }
}

/// Counts decoded assets without storing them.
#[derive(Debug, Default)]
pub struct MetricsSink {
    files: AtomicU64,
    bytes: AtomicU64,
}

impl MetricsSink {
    /// Create a sink with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of assets accepted so far.
    #[inline]
    pub fn files(&self) -> u64 {
        self.files.load(Ordering::Relaxed)
    }

    /// Total size of assets accepted so far.
    #[inline]
    pub fn bytes(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }
}

impl OutputSink for MetricsSink {
    fn accept(&self, _job: &Job, asset: &Plaintext) -> Result<()> {
        self.files.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(asset.len() as u64, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(bytes: &[u8], extension: &str) -> Plaintext {
        Plaintext {
            bytes: bytes.to_vec(),
            extension: extension.to_string(),
        }
    }

    #[test]
    fn test_destination_mirrors_input_root() {
        let sink = WriterSink::new("/game", "/out");
        let job = Job::new("/game/www/img/faces/Title.k9a", "/game/www/img");

        assert_eq!(
            sink.destination(&job, "png").unwrap(),
            PathBuf::from("/out/www/img/faces/Title.png")
        );
    }

    #[test]
    fn test_destination_outside_input_root_uses_job_root() {
        let sink = WriterSink::new("/unrelated", "/out");
        let job = Job::new("/game/www/audio/bgm/Theme.k9a", "/game/www/audio");

        assert_eq!(
            sink.destination(&job, "ogg").unwrap(),
            PathBuf::from("/out/bgm/Theme.ogg")
        );
    }

    #[test]
    fn test_writer_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        let output = dir.path().join("out");
        let sink = WriterSink::new(&input, &output);
        let job = Job::new(input.join("data/sub/Map001.k9a"), &input);

        sink.accept(&job, &asset(b"{}", "json")).unwrap();

        let written = fs::read(output.join("data/sub/Map001.json")).unwrap();
        assert_eq!(written, b"{}");
    }

    #[test]
    fn test_writer_reports_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the output directory should be.
        let blocker = dir.path().join("out");
        fs::write(&blocker, b"").unwrap();

        let sink = WriterSink::new(dir.path(), &blocker);
        let job = Job::new(dir.path().join("a/Title.k9a"), dir.path());

        assert!(matches!(
            sink.accept(&job, &asset(b"x", "png")),
            Err(Error::Io { .. })
        ));
    }

    #[test]
    fn test_extension_with_separator_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out");
        let sink = WriterSink::new(dir.path(), &output);
        let job = Job::new(dir.path().join("img/Title.k9a"), dir.path());

        assert!(matches!(
            sink.destination(&job, "a/b"),
            Err(Error::InvalidDestination { ref extension, .. }) if extension == "a/b"
        ));
        assert!(matches!(
            sink.accept(&job, &asset(b"x", "a/b")),
            Err(Error::InvalidDestination { .. })
        ));
        assert!(!output.exists());
    }

    #[test]
    fn test_empty_extension_drops_suffix() {
        let sink = WriterSink::new("/game", "/out");
        let job = Job::new("/game/data/Title.k9a", "/game/data");

        assert_eq!(
            sink.destination(&job, "").unwrap(),
            PathBuf::from("/out/data/Title")
        );
    }

    #[test]
    fn test_metrics_counts_without_writing() {
        let sink = MetricsSink::new();
        let job = Job::new("a/b.k9a", "a");

        sink.accept(&job, &asset(&[0; 10], "png")).unwrap();
        sink.accept(&job, &asset(&[0; 5], "ogg")).unwrap();

        assert_eq!(sink.files(), 2);
        assert_eq!(sink.bytes(), 15);
    }
}
