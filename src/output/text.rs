//! Text output formatter for human-readable display
//!
//! This module provides:
//! - One line per dependency with a colored status label
//! - Regression markers on notifications
//! - Summary with counts per outcome

use crate::domain::{DependencyOutcome, DependencyReport, RunReport};
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    /// Whether a dependency line is shown at this verbosity
    fn shows(&self, outcome: &DependencyOutcome) -> bool {
        match self.verbosity {
            Verbosity::Quiet => outcome.is_notified() || outcome.is_failed(),
            Verbosity::Normal => !matches!(outcome, DependencyOutcome::Unchanged { .. }),
            Verbosity::Verbose => true,
        }
    }

    fn label(&self, outcome: &DependencyOutcome, width: usize) -> String {
        let label = format!("{:width$}", outcome.label(), width = width);
        if !self.color {
            return label;
        }
        match outcome {
            DependencyOutcome::Bootstrapped { .. } => label.cyan().to_string(),
            DependencyOutcome::Unchanged { .. } => label.dimmed().to_string(),
            DependencyOutcome::Notified { .. } => label.green().bold().to_string(),
            DependencyOutcome::Failed { .. } => label.red().bold().to_string(),
        }
    }

    fn format_line(
        &self,
        entry: &DependencyReport,
        name_width: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let label = self.label(&entry.outcome, 12);
        let name = format!("{:width$}", entry.name, width = name_width);
        let name = if self.color {
            name.bold().to_string()
        } else {
            name
        };

        let detail = match &entry.outcome {
            DependencyOutcome::Notified {
                from,
                to,
                regression,
            } => {
                let arrow = if self.color {
                    "→".dimmed().to_string()
                } else {
                    "->".to_string()
                };
                let marker = match (*regression, self.color) {
                    (false, _) => String::new(),
                    (true, true) => format!(" {}", "[regression]".yellow()),
                    (true, false) => " [regression]".to_string(),
                };
                format!("{} {} {}{}", from, arrow, to, marker)
            }
            other => other.to_string(),
        };

        writeln!(writer, "  {} {} {}", label, name, detail)
    }

    fn format_summary(&self, report: &RunReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let mut parts = vec![
            format!("{} notified", report.notified_count()),
            format!("{} unchanged", report.unchanged_count()),
            format!("{} bootstrapped", report.bootstrapped_count()),
        ];
        let failed = format!("{} failed", report.failed_count());
        parts.push(if self.color && report.has_failures() {
            failed.red().to_string()
        } else {
            failed
        });

        writeln!(
            writer,
            "{} dependencies checked: {}",
            report.total(),
            parts.join(", ")
        )
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, report: &RunReport, writer: &mut dyn Write) -> std::io::Result<()> {
        if report.dry_run {
            let prefix = "(dry-run) notifications were printed, not posted";
            if self.color {
                writeln!(writer, "{}", prefix.cyan())?;
            } else {
                writeln!(writer, "{}", prefix)?;
            }
        }

        let name_width = report
            .dependencies
            .iter()
            .map(|d| d.name.len())
            .max()
            .unwrap_or(0)
            .max(20);

        for entry in &report.dependencies {
            if self.shows(&entry.outcome) {
                self.format_line(entry, name_width, writer)?;
            }
        }

        if self.verbosity != Verbosity::Quiet {
            self.format_summary(report, writer)?;
        }
        Ok(())
    }
}
