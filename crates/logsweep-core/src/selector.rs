//! File matching: glob expansion and modification-time snapshots.

use std::cmp::Ordering;
use std::path::PathBuf;
use std::time::SystemTime;

use crate::reporter::Reporter;

/// Snapshot of one matched file, taken at selection time.
///
/// The snapshot does not track the real file afterwards; a file mutated or
/// removed by an external process between selection and enforcement is
/// surfaced only when enforcement touches it.
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Path as produced by glob expansion.
    pub path: PathBuf,
    /// Modification time at selection.
    pub modified: SystemTime,
}

/// Matches files under a directory prefix against a shell-glob pattern.
///
/// Created empty from config and populated exactly once, by [`resolve`],
/// before the owning rule enforces.
///
/// [`resolve`]: FileSelector::resolve
#[derive(Debug, Clone)]
pub struct FileSelector {
    /// Directory prefix, concatenated verbatim with the pattern.
    pub directory: String,
    /// Shell-glob pattern.
    pub pattern: String,
    /// Matched files; empty until [`FileSelector::resolve`] runs.
    pub files: Vec<FileRecord>,
}

impl FileSelector {
    /// Create an unresolved selector.
    pub fn new(directory: String, pattern: String) -> Self {
        Self {
            directory,
            pattern,
            files: Vec::new(),
        }
    }

    /// Expand the glob and snapshot each match's modification time.
    ///
    /// The glob pattern is the directory string joined to the pattern
    /// string with no normalization; a config directory is expected to
    /// carry its own trailing separator.
    ///
    /// Selection failures are warnings, never errors: a malformed pattern
    /// leaves the selector empty, and a match that cannot be statted is
    /// dropped. Expansion order is filesystem-dependent; callers that care
    /// sort afterwards.
    pub fn resolve(&mut self, reporter: &dyn Reporter) {
        let pattern = format!("{}{}", self.directory, self.pattern);
        let entries = match glob::glob(&pattern) {
            Ok(entries) => entries,
            Err(err) => {
                reporter.warning(&format!("invalid glob pattern {pattern}: {err}"));
                return;
            }
        };

        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(err) => {
                    reporter.warning(&format!("skipping unreadable match: {err}"));
                    continue;
                }
            };
            match std::fs::metadata(&path).and_then(|meta| meta.modified()) {
                Ok(modified) => self.files.push(FileRecord { path, modified }),
                Err(err) => reporter.warning(&format!("stat {}: {err}", path.display())),
            }
        }

        tracing::debug!("{pattern}: {} files matched", self.files.len());
    }

    /// Sort matched files newest-first. Stable, so equal mtimes keep their
    /// expansion order within one run.
    pub fn sort_newest_first(&mut self) {
        self.files.sort_by(newest_first);
    }
}

/// Comparator ordering file records newest-first by modification time.
pub fn newest_first(a: &FileRecord, b: &FileRecord) -> Ordering {
    b.modified.cmp(&a.modified)
}
