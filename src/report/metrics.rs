//! Execution metrics computed from the merged tables

use crate::record::{DurationRecord, FailureRecord, StatusRecord, TestStatus};
use crate::store::MergedTables;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Label for status rows without a category
pub const UNCATEGORIZED: &str = "(uncategorized)";

/// Number of error types listed in [`ExecutionSummary::top_errors`]
pub const TOP_ERRORS: usize = 5;

/// Outcome counts and timing for one test category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMetrics {
    /// Test class or function
    pub category: String,
    /// Passed rows
    pub passed: usize,
    /// Failed rows
    pub failed: usize,
    /// Errored rows
    pub errors: usize,
    /// Skipped rows
    pub skipped: usize,
    /// All status rows in the category
    pub total_runs: usize,
    /// Sum of the known `total` cells of matching duration rows
    pub total_duration_secs: f64,
}

impl CategoryMetrics {
    fn new(category: &str) -> Self {
        Self {
            category: category.to_string(),
            passed: 0,
            failed: 0,
            errors: 0,
            skipped: 0,
            total_runs: 0,
            total_duration_secs: 0.0,
        }
    }

    fn count(&mut self, status: TestStatus) {
        match status {
            TestStatus::Passed => self.passed += 1,
            TestStatus::Failed => self.failed += 1,
            TestStatus::Error => self.errors += 1,
            TestStatus::Skipped => self.skipped += 1,
        }
        self.total_runs += 1;
    }

    /// Average duration per run, `None` without runs
    pub fn avg_duration_secs(&self) -> Option<f64> {
        (self.total_runs > 0).then(|| self.total_duration_secs / self.total_runs as f64)
    }
}

/// How often an error type occurred
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorFrequency {
    /// Exception or error type
    pub error: String,
    /// Number of failure rows carrying it
    pub count: usize,
}

/// Whole-store summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionSummary {
    /// All status rows
    pub total_runs: usize,
    /// Passed rows
    pub passed: usize,
    /// Failed rows
    pub failed: usize,
    /// Errored rows
    pub errors: usize,
    /// Skipped rows
    pub skipped: usize,
    /// `(failed + errors) / total_runs`, as a percentage with 2 decimals
    pub failure_rate_percent: f64,
    /// Distinct run ids seen across all tables, ascending
    pub runs: Vec<i64>,
    /// Most frequent error types, most frequent first
    pub top_errors: Vec<ErrorFrequency>,
    /// Per-category breakdown, sorted by category
    pub categories: Vec<CategoryMetrics>,
}

impl ExecutionSummary {
    /// Summarize the merged tables
    pub fn from_tables(tables: &MergedTables) -> Self {
        let categories = category_metrics(tables.status.rows(), tables.durations.rows());

        let sum = |f: fn(&CategoryMetrics) -> usize| categories.iter().map(f).sum::<usize>();
        let total_runs = sum(|c| c.total_runs);
        let failed = sum(|c| c.failed);
        let errors = sum(|c| c.errors);

        Self {
            total_runs,
            passed: sum(|c| c.passed),
            failed,
            errors,
            skipped: sum(|c| c.skipped),
            failure_rate_percent: percent(failed + errors, total_runs),
            runs: distinct_runs(tables),
            top_errors: top_errors(tables.failures.rows(), TOP_ERRORS),
            categories,
        }
    }
}

fn category_metrics(status: &[StatusRecord], durations: &[DurationRecord]) -> Vec<CategoryMetrics> {
    let mut by_category: BTreeMap<&str, CategoryMetrics> = BTreeMap::new();

    for row in status {
        let category = row.category.as_deref().unwrap_or(UNCATEGORIZED);
        by_category
            .entry(category)
            .or_insert_with(|| CategoryMetrics::new(category))
            .count(row.status);
    }

    for row in durations {
        let Some(category) = row.category.as_deref() else {
            continue;
        };
        if let Some(metrics) = by_category.get_mut(category) {
            if let Some(secs) = row.total.and_then(|t| t.as_f64()) {
                metrics.total_duration_secs += secs;
            }
        }
    }

    by_category.into_values().collect()
}

fn distinct_runs(tables: &MergedTables) -> Vec<i64> {
    let runs: BTreeSet<i64> = tables
        .status
        .iter()
        .map(|r| r.database_id)
        .chain(tables.durations.iter().map(|r| r.database_id))
        .chain(tables.failures.iter().map(|r| r.database_id))
        .collect();
    runs.into_iter().collect()
}

fn top_errors(failures: &[FailureRecord], limit: usize) -> Vec<ErrorFrequency> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for error in failures.iter().filter_map(|f| f.error.as_deref()) {
        *counts.entry(error).or_insert(0) += 1;
    }

    let mut frequencies: Vec<ErrorFrequency> = counts
        .into_iter()
        .map(|(error, count)| ErrorFrequency {
            error: error.to_string(),
            count,
        })
        .collect();
    frequencies.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.error.cmp(&b.error)));
    frequencies.truncate(limit);
    frequencies
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 10_000.0).round() / 100.0
}
