//! Per-test status rows from the session table

use super::sections::{SectionKind, Segments};
use super::test_line::parse_test_line;
use crate::record::{StatusRecord, UNKNOWN_RUN_ID};
use log::debug;

/// Extract one [`StatusRecord`] per result line of the session sections
///
/// Yields nothing in live-log mode, where the session table is replaced by
/// interleaved log output. Lines without a status keyword are skipped, as
/// are keyword lines that carry no test name.
pub fn parse_status(segments: &Segments<'_>) -> Vec<StatusRecord> {
    let mut records = Vec::new();

    for section in segments.of_kind(SectionKind::Session) {
        for line in &section.lines {
            let Some(parsed) = parse_test_line(line) else {
                continue;
            };
            let Some(name) = parsed.name else {
                debug!("status line without test name skipped: {:?}", line);
                continue;
            };

            records.push(StatusRecord {
                name,
                status: parsed.status,
                category: parsed.category.map(str::to_string),
                arguments: parsed.arguments.map(str::to_string),
                database_id: UNKNOWN_RUN_ID,
            });
        }
    }

    records
}
