//! Disk-usage probing via `statvfs(2)`.

use std::ffi::CString;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use crate::error::ProbeError;

/// Reads the fraction of a mount point's space in use.
///
/// Trait seam so rule building can be exercised against fixed readings
/// instead of a real filesystem.
pub trait UsageProbe {
    /// Percentage of space used on the volume mounted at `mount_point`,
    /// in `[0, 100]`.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] if the mount point cannot be statted. This
    /// is fatal for the run; a disk-pressure rule is never silently
    /// skipped over a bad reading.
    fn percent_used(&self, mount_point: &Path) -> Result<f64, ProbeError>;
}

/// Production probe backed by the `statvfs(2)` syscall.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatvfsProbe;

impl UsageProbe for StatvfsProbe {
    fn percent_used(&self, mount_point: &Path) -> Result<f64, ProbeError> {
        let c_path = CString::new(mount_point.as_os_str().as_bytes()).map_err(|_| ProbeError {
            mount_point: mount_point.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "path contains a NUL byte"),
        })?;

        let mut stat: libc::statvfs = unsafe { std::mem::zeroed() };
        let rc = unsafe { libc::statvfs(c_path.as_ptr(), &mut stat) };
        if rc != 0 {
            return Err(ProbeError {
                mount_point: mount_point.to_path_buf(),
                source: io::Error::last_os_error(),
            });
        }

        Ok(percent_used_from_counts(
            stat.f_frsize as u64,
            stat.f_blocks as u64,
            stat.f_bfree as u64,
            stat.f_bavail as u64,
        ))
    }
}

/// Usage percentage from raw `statvfs` block counts.
///
/// Root-reserved blocks (`f_bfree - f_bavail`) are excluded from free
/// space, so the result reflects what ordinary processes can actually
/// reclaim:
///
/// `used% = 100 * (total - user_free - root_only_free) / total`
fn percent_used_from_counts(frsize: u64, blocks: u64, bfree: u64, bavail: u64) -> f64 {
    let total = frsize * blocks;
    if total == 0 {
        return 0.0;
    }
    let user_free = frsize * bavail;
    let root_only_free = (frsize * bfree).saturating_sub(user_free);
    let used = total.saturating_sub(user_free).saturating_sub(root_only_free);
    100.0 * used as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formula_matches_worked_example() {
        // 1000 blocks of size 1: 200 free for users, 250 free for root,
        // so 50 blocks are root-reserved and count as used.
        let used = percent_used_from_counts(1, 1000, 250, 200);
        assert!((used - 75.0).abs() < 1e-9);
    }

    #[test]
    fn empty_filesystem_reports_zero_not_nan() {
        let used = percent_used_from_counts(4096, 0, 0, 0);
        assert!((used - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn result_stays_in_range_on_odd_counts() {
        // bavail > bfree should never happen, but a kernel quirk must not
        // produce a percentage outside [0, 100].
        let used = percent_used_from_counts(4096, 100, 10, 20);
        assert!((0.0..=100.0).contains(&used));
    }

    #[test]
    fn probes_a_real_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let used = StatvfsProbe.percent_used(tmp.path()).unwrap();
        assert!((0.0..=100.0).contains(&used));
    }

    #[test]
    fn missing_mount_point_is_an_error() {
        let err = StatvfsProbe
            .percent_used(Path::new("/definitely/not/a/mount"))
            .unwrap_err();
        assert_eq!(err.source.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("/definitely/not/a/mount"));
    }
}
