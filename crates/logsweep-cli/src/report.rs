//! Console reporter routing engine events through `tracing`.

use std::path::Path;

use logsweep_core::{Reporter, SweepStats};

/// Logs actions at info level and diagnostics at warn level. In dry-run
/// mode actions are worded as predictions.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LogReporter {
    dry_run: bool,
}

impl LogReporter {
    pub(crate) fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }
}

impl Reporter for LogReporter {
    fn removing(&self, path: &Path) {
        if self.dry_run {
            tracing::info!("would remove {}", path.display());
        } else {
            tracing::info!("removing {}", path.display());
        }
    }

    fn truncating(&self, path: &Path) {
        if self.dry_run {
            tracing::info!("would truncate {}", path.display());
        } else {
            tracing::info!("truncating {}", path.display());
        }
    }

    fn skipped(&self, mount_point: &str, used: f64, threshold: f64) {
        tracing::info!("{mount_point}: {used:.1}% used, under {threshold:.1}% threshold, skipping");
    }

    fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    fn warning(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    fn summary(&self, stats: &SweepStats) {
        if self.dry_run {
            tracing::info!(
                "dry run: would remove {} and truncate {} file(s)",
                stats.removed,
                stats.truncated
            );
        } else {
            tracing::info!(
                "removed {} file(s), truncated {}",
                stats.removed,
                stats.truncated
            );
        }
    }
}
