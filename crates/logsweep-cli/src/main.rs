//! logsweep - retention housekeeping for log directories.
//!
//! One pass: read the config, build the rule set (probing disk usage
//! where a rule calls for it), enforce each rule in order, report totals.
//! Any fatal error exits non-zero with the underlying cause.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use logsweep_core::{Config, Reporter, RuleSet, StatvfsProbe};

use crate::report::LogReporter;

mod report;

#[derive(Parser, Debug)]
#[command(name = "logsweep", version, about = "Retention housekeeping for log directories")]
struct Args {
    /// Path to the retention config (TOML)
    #[arg(short, long, env = "LOGSWEEP_CONFIG")]
    config: PathBuf,

    /// Show what would happen without touching any file
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let bytes = std::fs::read(&args.config)
        .with_context(|| format!("failed to read config {}", args.config.display()))?;
    let config = Config::from_slice(&bytes)?;

    let reporter = LogReporter::new(args.dry_run);
    let rules = RuleSet::build(config, &StatvfsProbe, &reporter)?;
    let stats = rules.enforce(&reporter, args.dry_run)?;
    reporter.summary(&stats);

    Ok(())
}
