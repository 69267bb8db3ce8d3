//! Ingest command implementation
//!
//! Handles the `pytest-digest ingest` command which extracts the status,
//! durations and failures tables from pytest transcripts and merges them
//! into the stored tables.

use anyhow::Result;
use console::style;
use std::path::{Path, PathBuf};

use crate::config::ConfigLoader;
use crate::extract::LogExtractor;
use crate::fmt::WARNING;
use crate::pipeline::{IngestReport, Ingestor};
use crate::report::{output, ExecutionSummary, IngestOutput, SummaryReporter};

/// Ingest pytest transcripts into the stored tables
///
/// The store directory is `--store` when given, otherwise `store-dir` from
/// `.pytest-digest.toml`, otherwise `bin`.
///
/// # Examples
///
/// ```no_run
/// use pytest_digest::cmd::ingest::cmd_ingest;
/// use std::path::PathBuf;
///
/// cmd_ingest(&[PathBuf::from("logs/s3.useast1.4242.log")], None, false, false)?;
/// # Ok::<(), anyhow::Error>(())
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - No log files are given, or one cannot be read
/// - `.pytest-digest.toml` is invalid
/// - A stored table is corrupt or cannot be written
pub fn cmd_ingest(logs: &[PathBuf], store: Option<&Path>, json: bool, dry_run: bool) -> Result<()> {
    let (report, store_dir) = ingest_in(Path::new("."), logs, store, dry_run)?;

    if json {
        println!("{}", output::to_json(&IngestOutput::from_report(&report, &store_dir))?);
        return Ok(());
    }

    let reporter = SummaryReporter::new();
    reporter.print_ingest(&report);
    if report.documents.iter().any(|d| !d.run.is_known()) {
        println!(
            "\n{}{}",
            WARNING,
            style("Some log paths carry no run id; their rows were stored under databaseId 0")
                .yellow()
        );
    }
    reporter.print_summary(&ExecutionSummary::from_tables(&report.tables));
    if dry_run {
        println!("\n{}", style("Dry run: no tables were written").dim());
    } else {
        println!("\nTables saved to {}", style(store_dir.display()).cyan());
    }

    Ok(())
}

/// Run an ingest relative to `project_root`, returning the resolved store directory
pub(crate) fn ingest_in(
    project_root: &Path,
    logs: &[PathBuf],
    store: Option<&Path>,
    dry_run: bool,
) -> Result<(IngestReport, PathBuf)> {
    let config = ConfigLoader::load(project_root)?;
    let store_dir = match store {
        Some(dir) => dir.to_path_buf(),
        None => project_root.join(&config.store_dir),
    };

    let ingestor = Ingestor::new(&store_dir, LogExtractor::with_segmenter(config.segmenter()));
    let report = ingestor.ingest(logs, dry_run)?;
    Ok((report, store_dir))
}
