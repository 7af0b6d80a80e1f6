//! Container discovery.

use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::WalkDir;

use crate::Error;

/// One container to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Path of the container.
    pub source: PathBuf,
    /// Root directory the container was found under.
    pub root: PathBuf,
}

impl Job {
    /// Create a job for `source` found under `root`.
    pub fn new(source: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            root: root.into(),
        }
    }

    /// Path of the container relative to its root.
    ///
    /// Falls back to the bare file name when the source is not under the root.
    pub fn relative_path(&self) -> &Path {
        self.source
            .strip_prefix(&self.root)
            .ok()
            .filter(|rel| !rel.as_os_str().is_empty())
            .or_else(|| self.source.file_name().map(Path::new))
            .unwrap_or(&self.source)
    }
}

/// Outcome of scanning a set of roots.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Containers found, in traversal order.
    pub jobs: Vec<Job>,
    /// Roots that do not exist or are not directories.
    pub missing_roots: Vec<PathBuf>,
    /// Entries that could not be read during traversal.
    pub walk_errors: usize,
}

/// Recursively find files whose name matches `pattern` under each root.
///
/// Missing roots and unreadable entries are logged and recorded, never fatal.
pub fn discover(roots: &[PathBuf], pattern: &Pattern) -> Discovery {
    let mut discovery = Discovery::default();

    for root in roots {
        if !root.is_dir() {
            log::warn!("{}", Error::DirectoryNotFound(root.clone()));
            discovery.missing_roots.push(root.clone());
            continue;
        }

        for entry in WalkDir::new(root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping entry under {}: {}", root.display(), Error::from(e));
                    discovery.walk_errors += 1;
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            // Lossy so non-UTF-8 names still match on their ASCII suffix.
            if pattern.matches(&entry.file_name().to_string_lossy()) {
                discovery.jobs.push(Job::new(entry.into_path(), root.clone()));
            }
        }
    }

    log::debug!(
        "Discovered {} files under {} roots ({} missing)",
        discovery.jobs.len(),
        roots.len(),
        discovery.missing_roots.len()
    );

    discovery
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_discover_recurses_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("img");
        touch(&root.join("a.k9a"));
        touch(&root.join("faces/b.k9a"));
        touch(&root.join("faces/deep/c.k9a"));
        touch(&root.join("faces/readme.txt"));

        let pattern = Pattern::new("*.k9a").unwrap();
        let found = discover(&[root.clone()], &pattern);

        let mut names: Vec<_> = found
            .jobs
            .iter()
            .map(|j| j.relative_path().to_path_buf())
            .collect();
        names.sort();

        assert_eq!(
            names,
            [
                PathBuf::from("a.k9a"),
                PathBuf::from("faces/b.k9a"),
                PathBuf::from("faces/deep/c.k9a"),
            ]
        );
        assert!(found.jobs.iter().all(|j| j.root == root));
        assert!(found.missing_roots.is_empty());
    }

    #[test]
    fn test_missing_root_is_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("audio");
        touch(&present.join("bgm.k9a"));
        let missing = dir.path().join("nope");

        let pattern = Pattern::new("*.k9a").unwrap();
        let found = discover(&[missing.clone(), present], &pattern);

        assert_eq!(found.missing_roots, [missing]);
        assert_eq!(found.jobs.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_name_is_discovered() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("img");
        fs::create_dir_all(&root).unwrap();
        let name = OsStr::from_bytes(b"caf\xe9.k9a");
        if fs::write(root.join(name), b"").is_err() {
            // Filesystem refuses non-UTF-8 names.
            return;
        }

        let pattern = Pattern::new("*.k9a").unwrap();
        let found = discover(&[root.clone()], &pattern);

        assert_eq!(found.jobs.len(), 1);
        assert_eq!(found.jobs[0].source, root.join(name));
    }

    #[test]
    fn test_relative_path_fallback() {
        let job = Job::new("/elsewhere/file.k9a", "/root");
        assert_eq!(job.relative_path(), Path::new("file.k9a"));
    }
}
