//! Retention rules: per-file keep / truncate / delete decisions.
//!
//! Both rule kinds walk their matched files newest-first and purge from
//! position 1 onward. They differ only in what gates the purge (file age
//! vs. disk pressure) and in how the newest file is treated.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::time::{Duration, SystemTime};

use crate::policy::SweepStats;
use crate::reporter::Reporter;
use crate::selector::FileSelector;

/// One retention rule, dispatched through [`Rule::enforce`].
#[derive(Debug)]
pub enum Rule {
    /// Clean files modified longer ago than a cutoff.
    Age(AgeRule),
    /// Clean files while a mount point is over its usage threshold.
    Usage(UsageRule),
}

impl Rule {
    /// Apply the rule to its resolved file set.
    ///
    /// # Errors
    ///
    /// Propagates the first remove/truncate failure unchanged. Files
    /// processed before the failure stay processed.
    pub fn enforce(&self, reporter: &dyn Reporter, dry_run: bool) -> io::Result<SweepStats> {
        match self {
            Rule::Age(rule) => rule.enforce(reporter, dry_run),
            Rule::Usage(rule) => rule.enforce(reporter, dry_run),
        }
    }
}

/// Cleans matched files whose age exceeds a cutoff.
///
/// Files within the retention window are never touched, whatever their
/// position. Among the stale ones, only the newest may be truncated
/// instead of deleted, so at most one file survives cleanup with its
/// identity preserved for any process still writing to it.
#[derive(Debug)]
pub struct AgeRule {
    /// Mount point the watched directory lives on.
    pub mount_point: String,
    /// Resolved, newest-first file set.
    pub selector: FileSelector,
    /// Retention window.
    pub max_age: Duration,
    /// Truncate the newest stale file instead of deleting it.
    pub truncate: bool,
}

impl AgeRule {
    /// Delete every stale file, except that the newest stale file is
    /// truncated in place when `truncate` is set.
    ///
    /// # Errors
    ///
    /// Propagates the first remove/truncate failure unchanged, including
    /// the not-found error for a file that vanished after selection.
    pub fn enforce(&self, reporter: &dyn Reporter, dry_run: bool) -> io::Result<SweepStats> {
        tracing::debug!(
            "cleaning {}{} by age, cutoff {}s",
            self.selector.directory,
            self.selector.pattern,
            self.max_age.as_secs()
        );

        let now = SystemTime::now();
        let mut stats = SweepStats::default();
        for (i, record) in self.selector.files.iter().enumerate() {
            // A modification time in the future counts as age zero.
            let age = now.duration_since(record.modified).unwrap_or_default();
            if age <= self.max_age {
                continue;
            }
            if i == 0 && self.truncate {
                truncate_file(&record.path, reporter, dry_run)?;
                stats.truncated += 1;
            } else {
                remove_file(&record.path, reporter, dry_run)?;
                stats.removed += 1;
            }
        }
        Ok(stats)
    }
}

/// Cleans matched files once its mount point crossed the usage threshold.
///
/// Only constructed when the threshold is already exceeded; the gate lives
/// in rule-set building. Unlike [`AgeRule`], the newest file is spared
/// entirely unless `truncate` asks for it to be zeroed: usage pressure is
/// relieved by clearing old files first.
#[derive(Debug)]
pub struct UsageRule {
    /// Mount point whose usage gated the rule.
    pub mount_point: String,
    /// Resolved, newest-first file set.
    pub selector: FileSelector,
    /// The threshold that was exceeded, kept for reporting.
    pub threshold_percent: f64,
    /// Truncate the newest matched file instead of leaving it untouched.
    pub truncate: bool,
}

impl UsageRule {
    /// Delete everything but the newest file; truncate the newest only
    /// when `truncate` is set.
    ///
    /// # Errors
    ///
    /// Propagates the first remove/truncate failure unchanged.
    pub fn enforce(&self, reporter: &dyn Reporter, dry_run: bool) -> io::Result<SweepStats> {
        tracing::debug!(
            "cleaning {}{} on {} by usage",
            self.selector.directory,
            self.selector.pattern,
            self.mount_point
        );

        let mut stats = SweepStats::default();
        for (i, record) in self.selector.files.iter().enumerate() {
            if i == 0 {
                if self.truncate {
                    truncate_file(&record.path, reporter, dry_run)?;
                    stats.truncated += 1;
                }
            } else {
                remove_file(&record.path, reporter, dry_run)?;
                stats.removed += 1;
            }
        }
        Ok(stats)
    }
}

fn remove_file(path: &Path, reporter: &dyn Reporter, dry_run: bool) -> io::Result<()> {
    reporter.removing(path);
    if dry_run {
        return Ok(());
    }
    std::fs::remove_file(path)
}

fn truncate_file(path: &Path, reporter: &dyn Reporter, dry_run: bool) -> io::Result<()> {
    reporter.truncating(path);
    if dry_run {
        return Ok(());
    }
    OpenOptions::new().write(true).truncate(true).open(path)?;
    Ok(())
}
