//! CI run view parsing
//!
//! Reads the job list printed by `gh run view <id>`:
//!
//! ```text
//! JOBS
//! ✓ test-s3 / build in 1m30s (ID 18224402)
//! X test-ec2 / build in 2m4s (ID 18224403)
//!   X Run integration tests
//!
//! ANNOTATIONS
//! ```
//!
//! Each job line becomes a [`JobRecord`]; an indented failed step line is
//! attached to the job above it.

use crate::extract::{build_time_secs, sanitize};
use log::{debug, warn};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

const JOBS_MARKER: &str = "JOBS";
const ANNOTATIONS_MARKER: &str = "ANNOTATIONS";

static GLYPH_RE: OnceLock<Regex> = OnceLock::new();
static JOB_DELIMITER_RE: OnceLock<Regex> = OnceLock::new();

fn glyph_re() -> &'static Regex {
    GLYPH_RE.get_or_init(|| {
        // SAFETY: static pattern, exercised by the tests below.
        Regex::new(r"^(\s*)(✓|X)\s+").expect("glyph regex is valid")
    })
}

fn job_delimiter_re() -> &'static Regex {
    JOB_DELIMITER_RE.get_or_init(|| {
        // SAFETY: static alternation of literals.
        Regex::new(r" \| | / build in | \(ID |\| in| / cleanup in | /")
            .expect("job delimiter regex is valid")
    })
}

/// Final state of a CI job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobConclusion {
    /// Job succeeded
    Passed,
    /// Job failed
    Failed,
}

impl JobConclusion {
    fn keyword(self) -> &'static str {
        match self {
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
        }
    }

    fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "PASSED" => Some(Self::Passed),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for JobConclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One job of a CI run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    /// Whether the job passed
    pub conclusion: JobConclusion,
    /// Job name, e.g. `test-s3`
    pub test: String,
    /// Build time in whole seconds
    pub build_time_secs: u64,
    /// CI job id
    pub job_id: u64,
    /// Name of the failed step, when one was listed
    pub failed_at: Option<String>,
}

/// Parse the job list out of a CI run view
///
/// Returns an empty list, with a warning, when the text lacks a `JOBS`
/// block followed by an `ANNOTATIONS` block. Malformed job lines are
/// skipped.
pub fn parse_jobs(raw: &str) -> Vec<JobRecord> {
    let text = sanitize(raw);

    let Some(block) = jobs_block(&text) else {
        warn!("{} or {} section not found in run view", JOBS_MARKER, ANNOTATIONS_MARKER);
        return Vec::new();
    };

    let mut jobs: Vec<JobRecord> = Vec::new();
    for raw_line in block.lines() {
        let line = glyph_re().replace(raw_line, |caps: &Captures<'_>| {
            let conclusion = if &caps[2] == "✓" {
                JobConclusion::Passed
            } else {
                JobConclusion::Failed
            };
            format!("{}{} | ", &caps[1], conclusion.keyword())
        });

        let has_conclusion = line.contains("PASSED") || line.contains("FAILED");
        if line.contains("ID") && has_conclusion {
            match parse_job_line(&line) {
                Some(job) => jobs.push(job),
                None => debug!("skipping malformed job line: {:?}", raw_line.trim()),
            }
        } else if let Some((_, step)) = line.split_once("FAILED | ") {
            if let Some(last) = jobs.last_mut() {
                last.failed_at = Some(step.trim().to_string());
            }
        }
    }

    debug!("parsed {} jobs from run view", jobs.len());
    jobs
}

/// Text between the markers, `None` unless `JOBS` precedes `ANNOTATIONS`
fn jobs_block(text: &str) -> Option<&str> {
    let start = text.find(JOBS_MARKER)?;
    let end = text[start..].find(ANNOTATIONS_MARKER)? + start;
    Some(&text[start + JOBS_MARKER.len()..end])
}

fn parse_job_line(line: &str) -> Option<JobRecord> {
    let fields: Vec<&str> = job_delimiter_re()
        .split(line)
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect();

    let [conclusion, test, build_time, job_id] = fields.as_slice() else {
        return None;
    };

    Some(JobRecord {
        conclusion: JobConclusion::from_keyword(conclusion)?,
        test: test.to_string(),
        build_time_secs: build_time_secs(build_time)?,
        job_id: job_id.trim_end_matches(')').trim().parse().ok()?,
        failed_at: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RUN_VIEW: &str = "\
\x1b[1mX main integration-tests · 9876543210\x1b[0m
Triggered via push about 2 hours ago

JOBS
\x1b[32m✓\x1b[0m test-s3 / build in 1m30s (ID 18224402)
\x1b[31mX\x1b[0m test-ec2 / build in 2m4s (ID 18224403)
  X Run integration tests
✓ test-iam / cleanup in 45s (ID 18224404)

ANNOTATIONS
X Process completed with exit code 1.
test-ec2: .github#1
";

    #[test]
    fn test_parse_jobs_reads_every_job_line() {
        let jobs = parse_jobs(RUN_VIEW);

        assert_eq!(jobs.len(), 3);
        assert_eq!(
            jobs[0],
            JobRecord {
                conclusion: JobConclusion::Passed,
                test: "test-s3".to_string(),
                build_time_secs: 90,
                job_id: 18224402,
                failed_at: None,
            }
        );
        assert_eq!(jobs[2].test, "test-iam");
        assert_eq!(jobs[2].build_time_secs, 45);
    }

    #[test]
    fn test_parse_jobs_attaches_failed_step_to_previous_job() {
        let jobs = parse_jobs(RUN_VIEW);

        assert_eq!(jobs[1].conclusion, JobConclusion::Failed);
        assert_eq!(jobs[1].build_time_secs, 124);
        assert_eq!(jobs[1].failed_at.as_deref(), Some("Run integration tests"));
        assert_eq!(jobs[0].failed_at, None);
    }

    #[test]
    fn test_parse_jobs_ignores_annotations_block() {
        let jobs = parse_jobs(RUN_VIEW);
        let annotation = Some("Process completed with exit code 1.");
        assert!(jobs.iter().all(|j| j.failed_at.as_deref() != annotation));
    }

    #[test]
    fn test_parse_jobs_without_markers_is_empty() {
        assert!(parse_jobs("✓ test-s3 / build in 1m (ID 1)\n").is_empty());
        assert!(parse_jobs("JOBS\n✓ test-s3 / build in 1m (ID 1)\n").is_empty());
    }

    #[test]
    fn test_parse_jobs_markers_out_of_order_is_empty() {
        let text = "ANNOTATIONS\nJOBS\n✓ test-s3 / build in 1m (ID 1)\n";
        assert!(parse_jobs(text).is_empty());
    }

    #[test]
    fn test_parse_jobs_skips_malformed_job_lines() {
        let text = "JOBS\n✓ test-s3 (ID notanumber)\n✓ ok / build in 5s (ID 7)\nANNOTATIONS\n";
        let jobs = parse_jobs(text);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].job_id, 7);
    }

    #[test]
    fn test_parse_jobs_keeps_capital_x_inside_job_names() {
        let text = "JOBS\n✓ test-XML / build in 5s (ID 8)\nANNOTATIONS\n";
        let jobs = parse_jobs(text);
        assert_eq!(jobs[0].test, "test-XML");
    }

    #[test]
    fn test_job_record_serializes_camel_case() {
        let json = serde_json::to_value(&parse_jobs(RUN_VIEW)[1]).unwrap();
        assert_eq!(json["conclusion"], "FAILED");
        assert_eq!(json["buildTimeSecs"], 124);
        assert_eq!(json["failedAt"], "Run integration tests");
    }
}
