//! Rule-set construction and sequential enforcement.

use std::io;
use std::path::Path;
use std::time::Duration;

use crate::config::{Config, SelectorDef};
use crate::error::ProbeError;
use crate::probe::UsageProbe;
use crate::reporter::Reporter;
use crate::rule::{AgeRule, Rule, UsageRule};
use crate::selector::FileSelector;

/// Totals across one enforcement pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepStats {
    /// Files deleted (or that would be, in a dry run).
    pub removed: usize,
    /// Files truncated to zero length.
    pub truncated: usize,
}

/// An ordered collection of retention rules.
///
/// Rules run in config order: the age-rules list first, then the
/// usage-rules list, each in document order. Inactive usage rules never
/// enter the set.
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Build an enforceable rule set from a parsed config.
    ///
    /// Every age rule's selector is resolved and sorted here. Each usage
    /// rule's mount point is probed first; a rule at or under its
    /// threshold is skipped outright, before any file selection.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] if any usage rule's mount point cannot be
    /// statted. Selection problems are reporter warnings, not errors.
    pub fn build(
        config: Config,
        probe: &dyn UsageProbe,
        reporter: &dyn Reporter,
    ) -> Result<Self, ProbeError> {
        let mut rules = Vec::new();

        for def in config.age_rules {
            rules.push(Rule::Age(AgeRule {
                mount_point: def.mount_point,
                selector: resolve_selector(def.logs, reporter),
                max_age: Duration::from_secs(def.max_age_seconds),
                truncate: def.truncate,
            }));
        }

        for def in config.usage_rules {
            let used = probe.percent_used(Path::new(&def.mount_point))?;
            if used <= def.usage_threshold_percent {
                reporter.skipped(&def.mount_point, used, def.usage_threshold_percent);
                continue;
            }
            rules.push(Rule::Usage(UsageRule {
                mount_point: def.mount_point,
                selector: resolve_selector(def.logs, reporter),
                threshold_percent: def.usage_threshold_percent,
                truncate: def.truncate,
            }));
        }

        Ok(Self { rules })
    }

    /// The rules that will run, in execution order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Whether any rule will run.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule strictly in sequence.
    ///
    /// # Errors
    ///
    /// The first rule failure stops execution immediately and propagates
    /// unchanged; remaining rules do not run.
    pub fn enforce(&self, reporter: &dyn Reporter, dry_run: bool) -> io::Result<SweepStats> {
        let mut stats = SweepStats::default();
        for rule in &self.rules {
            let ran = rule.enforce(reporter, dry_run)?;
            stats.removed += ran.removed;
            stats.truncated += ran.truncated;
        }
        Ok(stats)
    }
}

fn resolve_selector(def: SelectorDef, reporter: &dyn Reporter) -> FileSelector {
    let mut selector = FileSelector::new(def.directory, def.pattern);
    selector.resolve(reporter);
    selector.sort_newest_first();
    selector
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::NullReporter;
    use crate::selector::FileRecord;
    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::time::SystemTime;
    use tempfile::tempdir;

    /// Probe returning the same reading for every mount point.
    struct FixedProbe(f64);

    impl UsageProbe for FixedProbe {
        fn percent_used(&self, _: &Path) -> Result<f64, ProbeError> {
            Ok(self.0)
        }
    }

    /// Probe that always fails, as for an unreadable mount point.
    struct FailingProbe;

    impl UsageProbe for FailingProbe {
        fn percent_used(&self, mount_point: &Path) -> Result<f64, ProbeError> {
            Err(ProbeError {
                mount_point: mount_point.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such mount"),
            })
        }
    }

    /// Captures skip events so activation gating can be asserted on.
    #[derive(Default)]
    struct RecordingReporter {
        skips: Mutex<Vec<String>>,
    }

    impl Reporter for RecordingReporter {
        fn removing(&self, _: &Path) {}
        fn truncating(&self, _: &Path) {}
        fn skipped(&self, mount_point: &str, _: f64, _: f64) {
            self.skips.lock().unwrap().push(mount_point.to_string());
        }
        fn info(&self, _: &str) {}
        fn warning(&self, _: &str) {}
        fn summary(&self, _: &SweepStats) {}
    }

    fn touch(dir: &Path, name: &str, age: Duration) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(b"some log content\n").unwrap();
        file.set_modified(SystemTime::now() - age).unwrap();
        path
    }

    fn config_with(dir: &Path, threshold: f64) -> Config {
        let doc = format!(
            r#"
            [[usage_rules]]
            mount_point = "/var"
            usage_threshold_percent = {threshold:.1}

            [usage_rules.logs]
            directory = "{}/"
            pattern = "*.log"
            "#,
            dir.display()
        );
        Config::from_slice(doc.as_bytes()).unwrap()
    }

    #[test]
    fn usage_rule_under_threshold_is_skipped_entirely() {
        let tmp = tempdir().unwrap();
        let kept_a = touch(tmp.path(), "a.log", Duration::from_secs(1000));
        let kept_b = touch(tmp.path(), "b.log", Duration::from_secs(2000));

        let reporter = RecordingReporter::default();
        let rules =
            RuleSet::build(config_with(tmp.path(), 85.0), &FixedProbe(40.0), &reporter).unwrap();

        assert!(rules.is_empty());
        assert_eq!(*reporter.skips.lock().unwrap(), ["/var"]);

        let stats = rules.enforce(&NullReporter, false).unwrap();
        assert_eq!(stats, SweepStats::default());
        assert!(kept_a.exists());
        assert!(kept_b.exists());
    }

    #[test]
    fn usage_exactly_at_threshold_does_not_activate() {
        let tmp = tempdir().unwrap();
        let reporter = RecordingReporter::default();
        let rules =
            RuleSet::build(config_with(tmp.path(), 85.0), &FixedProbe(85.0), &reporter).unwrap();
        assert!(rules.is_empty());
        assert_eq!(reporter.skips.lock().unwrap().len(), 1);
    }

    #[test]
    fn usage_rule_over_threshold_enters_the_set() {
        let tmp = tempdir().unwrap();
        touch(tmp.path(), "a.log", Duration::from_secs(1000));

        let rules = RuleSet::build(
            config_with(tmp.path(), 85.0),
            &FixedProbe(92.5),
            &NullReporter,
        )
        .unwrap();

        assert_eq!(rules.rules().len(), 1);
        assert!(matches!(rules.rules()[0], Rule::Usage(_)));
    }

    #[test]
    fn probe_failure_aborts_the_build() {
        let tmp = tempdir().unwrap();
        let err = RuleSet::build(config_with(tmp.path(), 85.0), &FailingProbe, &NullReporter)
            .unwrap_err();
        assert_eq!(err.mount_point, Path::new("/var"));
    }

    #[test]
    fn age_rules_run_before_usage_rules_in_config_order() {
        let tmp = tempdir().unwrap();
        let doc = format!(
            r#"
            [[age_rules]]
            mount_point = "/one"
            max_age_seconds = 60
            [age_rules.logs]
            directory = "{dir}/"
            pattern = "*.log"

            [[age_rules]]
            mount_point = "/two"
            max_age_seconds = 60
            [age_rules.logs]
            directory = "{dir}/"
            pattern = "*.log"

            [[usage_rules]]
            mount_point = "/three"
            usage_threshold_percent = 50.0
            [usage_rules.logs]
            directory = "{dir}/"
            pattern = "*.log"
            "#,
            dir = tmp.path().display()
        );
        let config = Config::from_slice(doc.as_bytes()).unwrap();
        let rules = RuleSet::build(config, &FixedProbe(75.0), &NullReporter).unwrap();

        let mounts: Vec<&str> = rules
            .rules()
            .iter()
            .map(|rule| match rule {
                Rule::Age(r) => r.mount_point.as_str(),
                Rule::Usage(r) => r.mount_point.as_str(),
            })
            .collect();
        assert_eq!(mounts, ["/one", "/two", "/three"]);
    }

    #[test]
    fn stops_on_first_failing_rule() {
        let tmp = tempdir().unwrap();
        let first = touch(tmp.path(), "first.log", Duration::from_secs(1000));
        let third = touch(tmp.path(), "third.log", Duration::from_secs(1000));

        let stale = |path: &Path| FileSelector {
            directory: String::new(),
            pattern: String::new(),
            files: vec![FileRecord {
                path: path.to_path_buf(),
                modified: SystemTime::UNIX_EPOCH,
            }],
        };
        let rule_for = |path: &Path| {
            Rule::Age(AgeRule {
                mount_point: "/".to_string(),
                selector: stale(path),
                max_age: Duration::from_secs(5),
                truncate: false,
            })
        };

        let rules = RuleSet {
            rules: vec![
                rule_for(&first),
                rule_for(&tmp.path().join("missing.log")),
                rule_for(&third),
            ],
        };

        let err = rules.enforce(&NullReporter, false).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);

        // The first rule ran to completion, the third never ran.
        assert!(!first.exists());
        assert!(third.exists());
    }

    #[test]
    fn enforce_sums_stats_across_rules() {
        let tmp = tempdir().unwrap();
        touch(tmp.path(), "a.log", Duration::from_secs(1000));
        touch(tmp.path(), "b.log", Duration::from_secs(2000));
        touch(tmp.path(), "c.old", Duration::from_secs(3000));

        let doc = format!(
            r#"
            [[age_rules]]
            mount_point = "/"
            max_age_seconds = 60
            truncate = true
            [age_rules.logs]
            directory = "{dir}/"
            pattern = "*.log"

            [[age_rules]]
            mount_point = "/"
            max_age_seconds = 60
            [age_rules.logs]
            directory = "{dir}/"
            pattern = "*.old"
            "#,
            dir = tmp.path().display()
        );
        let config = Config::from_slice(doc.as_bytes()).unwrap();
        let rules = RuleSet::build(config, &FixedProbe(0.0), &NullReporter).unwrap();

        let stats = rules.enforce(&NullReporter, false).unwrap();
        assert_eq!(stats, SweepStats { removed: 2, truncated: 1 });
    }
}
