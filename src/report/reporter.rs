//! Console rendering of ingest results, summaries and job lists

use super::metrics::ExecutionSummary;
use crate::fmt::{format_secs, truncate, CHART, CHECKMARK, CROSSMARK, FLOPPY, MICROSCOPE};
use crate::jobs::{JobConclusion, JobRecord};
use crate::pipeline::IngestReport;
use console::style;
use std::fmt::Write;

const WIDTH: usize = 80;

/// Renders reports as fixed-width console tables
pub struct SummaryReporter;

impl SummaryReporter {
    /// Create a new reporter
    pub fn new() -> Self {
        Self
    }

    /// Print per-file extraction counts and per-table merge counts
    pub fn print_ingest(&self, report: &IngestReport) {
        print!("{}", self.render_ingest(report));
    }

    /// Print the store summary
    pub fn print_summary(&self, summary: &ExecutionSummary) {
        print!("{}", self.render_summary(summary));
    }

    /// Print a job list
    pub fn print_jobs(&self, jobs: &[JobRecord]) {
        print!("{}", self.render_jobs(jobs));
    }

    /// Ingest report as text
    pub fn render_ingest(&self, report: &IngestReport) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "\n{}{}", MICROSCOPE, style("Extracted").bold());
        let _ = writeln!(out, "{}", "=".repeat(WIDTH));
        let _ = writeln!(
            out,
            "{:<46} {:>12} {:>6} {:>6} {:>6}",
            "Log", "Run", "Status", "Durat.", "Fail."
        );
        let _ = writeln!(out, "{}", "-".repeat(WIDTH));
        for doc in &report.documents {
            let _ = writeln!(
                out,
                "{:<46} {:>12} {:>6} {:>6} {:>6}",
                truncate(&doc.path.display().to_string(), 46),
                doc.run.database_id,
                doc.status,
                doc.durations,
                doc.failures
            );
        }

        let verb = if report.dry_run {
            "Would store"
        } else {
            "Stored"
        };
        let _ = writeln!(out, "\n{}{}", FLOPPY, style(verb).bold());
        for stats in &report.stats {
            let _ = writeln!(
                out,
                "   {:<10} {:>8} rows ({:+})",
                stats.kind.label(),
                stats.after,
                stats.added()
            );
        }

        out
    }

    /// Store summary as text
    pub fn render_summary(&self, summary: &ExecutionSummary) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "\n{}{}", CHART, style("Execution Summary").bold());
        let _ = writeln!(out, "{}", "=".repeat(WIDTH));
        let _ = writeln!(out, "   Runs:         {}", summary.runs.len());
        let _ = writeln!(out, "   Tests:        {}", summary.total_runs);
        let _ = writeln!(out, "   Passed:       {}", style(summary.passed).green());
        let _ = writeln!(out, "   Failed:       {}", style(summary.failed).red());
        let _ = writeln!(out, "   Errors:       {}", style(summary.errors).red());
        let _ = writeln!(out, "   Skipped:      {}", style(summary.skipped).dim());
        let _ = writeln!(
            out,
            "   Failure rate: {:.2}%",
            summary.failure_rate_percent
        );

        if !summary.categories.is_empty() {
            let _ = writeln!(out, "{}", "-".repeat(WIDTH));
            let _ = writeln!(
                out,
                "{:<36} {:>6} {:>6} {:>6} {:>6} {:>14}",
                "Category", "Pass", "Fail", "Error", "Skip", "Time"
            );
            let _ = writeln!(out, "{}", "-".repeat(WIDTH));
            for c in &summary.categories {
                let _ = writeln!(
                    out,
                    "{:<36} {:>6} {:>6} {:>6} {:>6} {:>14}",
                    truncate(&c.category, 36),
                    c.passed,
                    c.failed,
                    c.errors,
                    c.skipped,
                    format_secs(c.total_duration_secs)
                );
            }
        }

        if !summary.top_errors.is_empty() {
            let _ = writeln!(out, "{}", "-".repeat(WIDTH));
            let _ = writeln!(out, "{}", style("Most frequent errors").bold());
            for e in &summary.top_errors {
                let _ = writeln!(out, "   {:>4}x {}", e.count, truncate(&e.error, WIDTH - 10));
            }
        }

        let _ = writeln!(out, "{}", "=".repeat(WIDTH));
        out
    }

    /// Job list as text
    pub fn render_jobs(&self, jobs: &[JobRecord]) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "{}", "=".repeat(WIDTH));
        let _ = writeln!(
            out,
            "   {:<40} {:>14} {:>18}",
            "Job", "Build time", "Job ID"
        );
        let _ = writeln!(out, "{}", "-".repeat(WIDTH));
        for job in jobs {
            let mark = match job.conclusion {
                JobConclusion::Passed => CHECKMARK,
                JobConclusion::Failed => CROSSMARK,
            };
            let _ = writeln!(
                out,
                "{}{:<40} {:>14} {:>18}",
                mark,
                truncate(&job.test, 40),
                format_secs(job.build_time_secs as f64),
                job.job_id
            );
            if let Some(step) = &job.failed_at {
                let _ = writeln!(out, "      failed at: {}", style(step).red());
            }
        }
        let _ = writeln!(out, "{}", "=".repeat(WIDTH));
        out
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}
