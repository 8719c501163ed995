//! Per-dependency outcomes and the overall run report

use super::Dependency;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Terminal state reached by one dependency during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DependencyOutcome {
    /// No reference existed; the fetched snapshot became the reference
    Bootstrapped { version: String },
    /// Upstream version equals the reference
    Unchanged { version: String },
    /// New release detected, notification posted and reference updated
    Notified {
        from: String,
        to: String,
        /// New version sorts below the reference under semver rules
        regression: bool,
    },
    /// Processing stopped for this dependency
    Failed { kind: String, message: String },
}

impl DependencyOutcome {
    /// Creates a Failed outcome from an error
    pub fn failed(kind: impl Into<String>, message: impl Into<String>) -> Self {
        DependencyOutcome::Failed {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Returns true if a notification was posted
    pub fn is_notified(&self) -> bool {
        matches!(self, DependencyOutcome::Notified { .. })
    }

    /// Returns true if processing failed
    pub fn is_failed(&self) -> bool {
        matches!(self, DependencyOutcome::Failed { .. })
    }

    /// Short label for display
    pub fn label(&self) -> &'static str {
        match self {
            DependencyOutcome::Bootstrapped { .. } => "bootstrapped",
            DependencyOutcome::Unchanged { .. } => "unchanged",
            DependencyOutcome::Notified { .. } => "notified",
            DependencyOutcome::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for DependencyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyOutcome::Bootstrapped { version } => {
                write!(f, "stored {} as new reference", version)
            }
            DependencyOutcome::Unchanged { version } => write!(f, "no new version ({})", version),
            DependencyOutcome::Notified { from, to, .. } => write!(f, "{} -> {}", from, to),
            DependencyOutcome::Failed { message, .. } => write!(f, "{}", message),
        }
    }
}

/// Outcome for a single dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyReport {
    /// Dependency identifier
    pub name: String,
    /// Plugin name from the config file
    pub plugin: String,
    /// What happened
    pub outcome: DependencyOutcome,
}

impl DependencyReport {
    /// Creates a report entry for a dependency
    pub fn new(dependency: &Dependency, outcome: DependencyOutcome) -> Self {
        Self {
            name: dependency.name.clone(),
            plugin: dependency.plugin.clone(),
            outcome,
        }
    }
}

/// Summary of one invocation over all configured dependencies
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Whether notifications were printed instead of posted
    pub dry_run: bool,
    /// Results in config file order
    pub dependencies: Vec<DependencyReport>,
}

impl RunReport {
    /// Creates an empty report
    pub fn new(dry_run: bool) -> Self {
        Self {
            started_at: Utc::now(),
            dry_run,
            dependencies: Vec::new(),
        }
    }

    /// Adds a dependency result
    pub fn add(&mut self, report: DependencyReport) {
        self.dependencies.push(report);
    }

    /// Returns the number of dependencies processed
    pub fn total(&self) -> usize {
        self.dependencies.len()
    }

    /// Returns the number of notifications posted
    pub fn notified_count(&self) -> usize {
        self.count(|o| o.is_notified())
    }

    /// Returns the number of failed dependencies
    pub fn failed_count(&self) -> usize {
        self.count(|o| o.is_failed())
    }

    /// Returns the number of bootstrapped references
    pub fn bootstrapped_count(&self) -> usize {
        self.count(|o| matches!(o, DependencyOutcome::Bootstrapped { .. }))
    }

    /// Returns the number of unchanged dependencies
    pub fn unchanged_count(&self) -> usize {
        self.count(|o| matches!(o, DependencyOutcome::Unchanged { .. }))
    }

    /// Returns true if any dependency failed
    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }

    /// Looks up the outcome for a dependency by name
    pub fn outcome_for(&self, name: &str) -> Option<&DependencyOutcome> {
        self.dependencies
            .iter()
            .find(|d| d.name == name)
            .map(|d| &d.outcome)
    }

    fn count(&self, pred: impl Fn(&DependencyOutcome) -> bool) -> usize {
        self.dependencies.iter().filter(|d| pred(&d.outcome)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> RunReport {
        let mut report = RunReport::new(false);
        report.add(DependencyReport::new(
            &Dependency::new("a/a", "github"),
            DependencyOutcome::Bootstrapped {
                version: "1.0".to_string(),
            },
        ));
        report.add(DependencyReport::new(
            &Dependency::new("b/b", "github"),
            DependencyOutcome::Notified {
                from: "1.0".to_string(),
                to: "1.1".to_string(),
                regression: false,
            },
        ));
        report.add(DependencyReport::new(
            &Dependency::new("c", "bogus"),
            DependencyOutcome::failed("plugin_load", "unknown plugin"),
        ));
        report.add(DependencyReport::new(
            &Dependency::new("d/d", "github"),
            DependencyOutcome::Unchanged {
                version: "2.0".to_string(),
            },
        ));
        report
    }

    #[test]
    fn test_counts() {
        let report = sample_report();
        assert_eq!(report.total(), 4);
        assert_eq!(report.bootstrapped_count(), 1);
        assert_eq!(report.notified_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.unchanged_count(), 1);
        assert!(report.has_failures());
    }

    #[test]
    fn test_outcome_for() {
        let report = sample_report();
        assert!(report.outcome_for("b/b").unwrap().is_notified());
        assert!(report.outcome_for("missing").is_none());
    }

    #[test]
    fn test_outcome_display() {
        let outcome = DependencyOutcome::Notified {
            from: "3.45".to_string(),
            to: "3.46".to_string(),
            regression: false,
        };
        assert_eq!(outcome.to_string(), "3.45 -> 3.46");
        assert_eq!(outcome.label(), "notified");
    }

    #[test]
    fn test_outcome_serializes_with_tag() {
        let outcome = DependencyOutcome::Unchanged {
            version: "1.0".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["type"], "unchanged");
        assert_eq!(json["version"], "1.0");
    }

    #[test]
    fn test_empty_report_has_no_failures() {
        let report = RunReport::new(true);
        assert!(report.dry_run);
        assert_eq!(report.total(), 0);
        assert!(!report.has_failures());
    }
}
