//! Error types for retention-policy evaluation and enforcement.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Configuration bytes could not be parsed into rule definitions.
///
/// Always fatal, and always raised before any filesystem mutation.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error(transparent)]
    Parse(#[from] toml::de::Error),
}

/// Disk-usage statistics could not be obtained for a mount point.
///
/// Fatal for the whole run; a disk-pressure rule is never silently
/// skipped over a bad reading.
#[derive(Error, Debug)]
#[error("statvfs {}: {source}", mount_point.display())]
pub struct ProbeError {
    /// The mount point that could not be probed.
    pub mount_point: PathBuf,
    /// The underlying OS error.
    #[source]
    pub source: io::Error,
}

/// Any fatal failure a full sweep can produce.
///
/// Enforcement I/O errors pass through untransformed so the message a user
/// sees is the lowest-level cause.
#[derive(Error, Debug)]
pub enum SweepError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error(transparent)]
    Enforce(#[from] io::Error),
}
