//! JSON output formatter for machine processing

use crate::domain::{DependencyReport, RunReport};
use crate::output::OutputFormatter;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self
    }
}

/// JSON representation of the full report
#[derive(Serialize)]
struct JsonOutput<'a> {
    started_at: DateTime<Utc>,
    dry_run: bool,
    summary: JsonSummary,
    dependencies: &'a [DependencyReport],
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonSummary {
    total: usize,
    bootstrapped: usize,
    unchanged: usize,
    notified: usize,
    failed: usize,
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &RunReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = JsonOutput {
            started_at: report.started_at,
            dry_run: report.dry_run,
            summary: JsonSummary {
                total: report.total(),
                bootstrapped: report.bootstrapped_count(),
                unchanged: report.unchanged_count(),
                notified: report.notified_count(),
                failed: report.failed_count(),
            },
            dependencies: &report.dependencies,
        };

        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)
    }
}
