//! JSON output formatting for CI integration

use super::metrics::ExecutionSummary;
use crate::jobs::{JobConclusion, JobRecord};
use crate::pipeline::{DocumentReport, IngestReport};
use crate::store::MergeStats;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// `ingest --json` output
#[derive(Debug, Clone, Serialize)]
pub struct IngestOutput {
    /// Whether the batch was merged without error
    pub success: bool,
    /// Whether saving was skipped
    pub dry_run: bool,
    /// Directory holding the tables
    pub store_dir: PathBuf,
    /// Per-transcript extraction counts
    pub documents: Vec<DocumentReport>,
    /// Per-table merge counts
    pub tables: Vec<MergeStats>,
    /// Summary of the merged tables
    pub summary: ExecutionSummary,
}

impl IngestOutput {
    /// Build from an ingest report
    pub fn from_report(report: &IngestReport, store_dir: &Path) -> Self {
        Self {
            success: true,
            dry_run: report.dry_run,
            store_dir: store_dir.to_path_buf(),
            documents: report.documents.clone(),
            tables: report.stats.clone(),
            summary: ExecutionSummary::from_tables(&report.tables),
        }
    }
}

/// `summary --json` output
#[derive(Debug, Clone, Serialize)]
pub struct SummaryOutput {
    /// Directory holding the tables
    pub store_dir: PathBuf,
    /// Store summary
    #[serde(flatten)]
    pub summary: ExecutionSummary,
}

/// `jobs --json` output
#[derive(Debug, Clone, Serialize)]
pub struct JobsOutput {
    /// Jobs that passed
    pub passed: usize,
    /// Jobs that failed
    pub failed: usize,
    /// Every parsed job, in run view order
    pub jobs: Vec<JobRecord>,
}

impl JobsOutput {
    /// Build from parsed jobs
    pub fn new(jobs: Vec<JobRecord>) -> Self {
        let failed = jobs
            .iter()
            .filter(|j| j.conclusion == JobConclusion::Failed)
            .count();
        Self {
            passed: jobs.len() - failed,
            failed,
            jobs,
        }
    }
}

/// Pretty-print any output structure
pub fn to_json<T: Serialize>(output: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(output)?)
}
