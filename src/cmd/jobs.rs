//! Jobs command implementation
//!
//! Handles the `pytest-digest jobs` command which reads a saved
//! `gh run view` output and lists the CI jobs it describes.

use anyhow::Result;
use console::style;
use std::path::Path;

use crate::error::DigestError;
use crate::fmt::WARNING;
use crate::jobs::{parse_jobs, JobRecord};
use crate::report::{output, JobsOutput, SummaryReporter};

/// List the jobs of a saved CI run view
///
/// # Examples
///
/// ```no_run
/// use pytest_digest::cmd::jobs::cmd_jobs;
/// use std::path::Path;
///
/// // gh run view 9876543210 > run.txt
/// cmd_jobs(Path::new("run.txt"), false)?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn cmd_jobs(file: &Path, json: bool) -> Result<()> {
    let jobs = read_jobs(file)?;

    if json {
        println!("{}", output::to_json(&JobsOutput::new(jobs))?);
        return Ok(());
    }

    if jobs.is_empty() {
        println!(
            "{}{}",
            WARNING,
            style(format!("No jobs found in {}", file.display())).yellow()
        );
        return Ok(());
    }

    SummaryReporter::new().print_jobs(&jobs);
    Ok(())
}

pub(crate) fn read_jobs(file: &Path) -> Result<Vec<JobRecord>> {
    let text = std::fs::read_to_string(file).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            DigestError::LogNotFound {
                path: file.to_path_buf(),
            }
        } else {
            DigestError::LogRead {
                path: file.to_path_buf(),
                source,
            }
        }
    })?;
    Ok(parse_jobs(&text))
}
