//! Failure detail rows from the short test summary

use super::sections::{SectionKind, Segments};
use super::test_line::{parse_test_line, split_error};
use crate::record::{FailureRecord, UNKNOWN_RUN_ID};
use log::debug;

/// Extract one [`FailureRecord`] per `FAILED`/`ERROR` summary line
///
/// When the transcript has no summary, or the summary lists nothing, a
/// single all-absent placeholder is returned so the table keeps its shape.
/// The placeholder and other rows without an error type are dropped later,
/// when the failure table is built.
pub fn parse_failures(segments: &Segments<'_>) -> Vec<FailureRecord> {
    let lines: Vec<&str> = segments
        .of_kind(SectionKind::Summary)
        .flat_map(|s| s.lines.iter().copied())
        .collect();

    if lines.iter().all(|l| l.trim().is_empty()) {
        debug!("no summary section content, emitting placeholder failure row");
        return vec![FailureRecord::placeholder()];
    }

    let mut records = Vec::new();
    for line in lines {
        let Some(parsed) = parse_test_line(line) else {
            continue;
        };
        if !parsed.status.is_failure() {
            continue;
        }

        let (error, error_details) = match parsed.description {
            Some(description) => split_error(description),
            None => (None, None),
        };

        records.push(FailureRecord {
            name: parsed.name,
            status: Some(parsed.status),
            category: parsed.category.map(str::to_string),
            error: error.map(str::to_string),
            error_details: error_details.map(str::to_string),
            database_id: UNKNOWN_RUN_ID,
        });
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::sections::Segmenter;
    use crate::record::TestStatus;

    fn failures_of(text: &str) -> Vec<FailureRecord> {
        parse_failures(&Segmenter::new().segment(text))
    }

    #[test]
    fn test_parse_failures_splits_error_type_and_details() {
        let text = "\
=========== short test summary info ===========
FAILED test_foo::TestBar[param1] - ValueError: bad input
";
        let records = failures_of(text);

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.name.as_deref(), Some("test_foo"));
        assert_eq!(record.status, Some(TestStatus::Failed));
        assert_eq!(record.category.as_deref(), Some("TestBar"));
        assert_eq!(record.error.as_deref(), Some("ValueError"));
        assert_eq!(record.error_details.as_deref(), Some("bad input"));
        assert!(record.is_diagnostic());
    }

    #[test]
    fn test_parse_failures_reads_errors_without_arguments() {
        let text = "\
=========== short test summary info ===========
ERROR tests/test_s3.py::test_get - botocore.exceptions.ClientError: denied
";
        let records = failures_of(text);
        assert_eq!(records[0].status, Some(TestStatus::Error));
        assert_eq!(records[0].category.as_deref(), Some("test_get"));
        assert_eq!(
            records[0].error.as_deref(),
            Some("botocore.exceptions.ClientError")
        );
        assert_eq!(records[0].error_details.as_deref(), Some("denied"));
    }

    #[test]
    fn test_parse_failures_skips_passed_and_skipped_lines() {
        let text = "\
=========== short test summary info ===========
PASSED test_foo::test_ok
SKIPPED test_foo::test_later
FAILED test_foo::test_bad - AssertionError: nope
";
        let records = failures_of(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category.as_deref(), Some("test_bad"));
    }

    #[test]
    fn test_parse_failures_without_description_pads_error_fields() {
        let text = "\
=========== short test summary info ===========
FAILED test_foo::test_bad
";
        let records = failures_of(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].error, None);
        assert_eq!(records[0].error_details, None);
        assert!(!records[0].is_diagnostic());
    }

    #[test]
    fn test_parse_failures_missing_summary_yields_placeholder() {
        let records = failures_of("======= test session starts =======\nPASSED a::b\n");
        assert_eq!(records, vec![FailureRecord::placeholder()]);
    }

    #[test]
    fn test_parse_failures_empty_summary_yields_placeholder() {
        let records = failures_of("======= short test summary info =======\n\n");
        assert_eq!(records, vec![FailureRecord::placeholder()]);
    }
}
