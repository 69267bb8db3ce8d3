//! Summary command implementation
//!
//! Handles the `pytest-digest summary` command which reports pass/fail
//! counts, timing and frequent errors from the stored tables.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::config::ConfigLoader;
use crate::report::{output, ExecutionSummary, SummaryOutput, SummaryReporter};
use crate::store::{JsonTableStore, MergeStore};

/// Summarize the stored tables
///
/// # Errors
///
/// Returns an error if `.pytest-digest.toml` is invalid or a stored table
/// cannot be read. A store with no tables yet summarizes as empty.
pub fn cmd_summary(store: Option<&Path>, json: bool) -> Result<()> {
    let (summary, store_dir) = summarize_in(Path::new("."), store)?;

    if json {
        let output = SummaryOutput { store_dir, summary };
        println!("{}", output::to_json(&output)?);
    } else {
        SummaryReporter::new().print_summary(&summary);
    }

    Ok(())
}

pub(crate) fn summarize_in(
    project_root: &Path,
    store: Option<&Path>,
) -> Result<(ExecutionSummary, PathBuf)> {
    let store_dir = match store {
        Some(dir) => dir.to_path_buf(),
        None => project_root.join(ConfigLoader::load(project_root)?.store_dir),
    };

    let tables = MergeStore::new(JsonTableStore::new(&store_dir)).load_all()?;
    Ok((ExecutionSummary::from_tables(&tables), store_dir))
}
