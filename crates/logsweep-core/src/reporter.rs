//! Reporter trait for dependency injection
//!
//! This trait allows the enforcement engine to report actions and
//! diagnostics without being coupled to a specific output implementation.

use std::path::Path;

use crate::policy::SweepStats;

pub trait Reporter: Send + Sync {
    /// A matched file is being removed (or would be, in a dry run).
    fn removing(&self, path: &Path);

    /// A matched file is being truncated to zero length.
    fn truncating(&self, path: &Path);

    /// A usage rule was skipped because its mount point is under threshold.
    fn skipped(&self, mount_point: &str, used: f64, threshold: f64);

    /// Log an informational message.
    fn info(&self, msg: &str);

    /// Log a warning message.
    fn warning(&self, msg: &str);

    /// Display a final summary once every rule has run.
    fn summary(&self, stats: &SweepStats);
}

impl<T: Reporter + ?Sized> Reporter for std::sync::Arc<T> {
    fn removing(&self, path: &Path) {
        (**self).removing(path)
    }
    fn truncating(&self, path: &Path) {
        (**self).truncating(path)
    }
    fn skipped(&self, mount_point: &str, used: f64, threshold: f64) {
        (**self).skipped(mount_point, used, threshold)
    }
    fn info(&self, msg: &str) {
        (**self).info(msg)
    }
    fn warning(&self, msg: &str) {
        (**self).warning(msg)
    }
    fn summary(&self, stats: &SweepStats) {
        (**self).summary(stats)
    }
}

/// A no-op reporter for silent operations (e.g., testing).
#[derive(Clone, Copy, Debug)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn removing(&self, _: &Path) {}
    fn truncating(&self, _: &Path) {}
    fn skipped(&self, _: &str, _: f64, _: f64) {}
    fn info(&self, _: &str) {}
    fn warning(&self, _: &str) {}
    fn summary(&self, _: &SweepStats) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_reporter_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NullReporter>();
    }

    #[test]
    fn null_reporter_implements_all_methods() {
        let reporter = NullReporter;

        // All methods should be no-ops (no panics)
        reporter.removing(Path::new("/var/log/app/app.log"));
        reporter.truncating(Path::new("/var/log/app/app.log"));
        reporter.skipped("/var", 40.0, 85.0);
        reporter.info("info");
        reporter.warning("warning");
        reporter.summary(&SweepStats::default());
    }
}
