//! Retention configuration parsed from a TOML document.
//!
//! A config declares two ordered lists of rule definitions: age rules
//! (clean anything older than a cutoff) and usage rules (clean only while
//! the mount point is over a disk-usage threshold). List order is
//! preserved all the way through to enforcement order.

use serde::Deserialize;

use crate::error::ConfigError;

/// Top-level retention config.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Rules that clean by file age.
    #[serde(default)]
    pub age_rules: Vec<AgeRuleDef>,
    /// Rules that clean by disk usage.
    #[serde(default)]
    pub usage_rules: Vec<UsageRuleDef>,
}

/// Definition of one age-based rule.
#[derive(Debug, Clone, Deserialize)]
pub struct AgeRuleDef {
    /// Mount point the watched directory lives on.
    pub mount_point: String,
    /// Which files the rule applies to.
    pub logs: SelectorDef,
    /// Files modified longer ago than this are cleaned.
    pub max_age_seconds: u64,
    /// Truncate the newest stale file instead of deleting it.
    #[serde(default)]
    pub truncate: bool,
}

/// Definition of one usage-based rule.
#[derive(Debug, Clone, Deserialize)]
pub struct UsageRuleDef {
    /// Mount point whose usage gates the rule.
    pub mount_point: String,
    /// Which files the rule applies to.
    pub logs: SelectorDef,
    /// The rule only runs while usage exceeds this percentage.
    pub usage_threshold_percent: f64,
    /// Truncate the newest matched file instead of leaving it untouched.
    #[serde(default)]
    pub truncate: bool,
}

/// Directory prefix and glob pattern naming the files a rule matches.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorDef {
    /// Directory prefix, used verbatim (keep the trailing slash).
    pub directory: String,
    /// Shell-glob pattern appended to the directory.
    pub pattern: String,
}

impl Config {
    /// Parse a config from raw bytes as read off disk.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the bytes are not UTF-8 or not a valid
    /// config document. Parsing is structural only; field values are not
    /// validated.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ConfigError> {
        Ok(toml::from_str(std::str::from_utf8(bytes)?)?)
    }
}
