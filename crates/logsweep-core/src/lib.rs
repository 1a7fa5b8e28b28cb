//! Core library for logsweep - retention-policy evaluation and enforcement.
//!
//! One pass over a declarative config: match files by glob, probe disk
//! usage where a rule asks for it, then delete or truncate whatever
//! violates the configured retention.

pub mod config;
pub mod error;
pub mod policy;
pub mod probe;
pub mod reporter;
pub mod rule;
pub mod selector;

pub use config::Config;
pub use error::{ConfigError, ProbeError, SweepError};
pub use policy::{RuleSet, SweepStats};
pub use probe::{StatvfsProbe, UsageProbe};
pub use reporter::{NullReporter, Reporter};
