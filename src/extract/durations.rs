//! Timing rows from `pytest-durations` tables
//!
//! Each `... duration top` section looks like:
//!
//! ```text
//! ============== test call duration top ==============
//! total          name                     num avg            min
//! 0:00:00.040000 test_s3.py::test_put      2 0:00:00.020000 0:00:00.010000
//! ```
//!
//! The header line names the table, the first content line names the
//! columns and every following line is one row.

use super::sections::{Section, SectionKind, Segments};
use super::test_line::split_test_id;
use super::timespan::to_seconds;
use crate::record::{DurationRecord, Seconds, UNKNOWN_RUN_ID};
use log::{debug, warn};

/// Words dropped from a section header to form the duration type label
const HEADER_NOISE_WORDS: &[&str] = &["top", "test"];

/// Token marking a caption line rather than a column header or a row
const CAPTION_TOKEN: &str = "duration";

/// Columns the parser understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Name,
    Num,
    Avg,
    Min,
    Total,
    Ignored,
}

impl Column {
    fn from_header(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "name" => Self::Name,
            "num" => Self::Num,
            "avg" => Self::Avg,
            "min" => Self::Min,
            "total" => Self::Total,
            _ => Self::Ignored,
        }
    }
}

/// Extract timing rows from every duration section
///
/// Rows from all sections are concatenated in transcript order; no
/// deduplication happens here.
pub fn parse_durations(segments: &Segments<'_>) -> Vec<DurationRecord> {
    segments
        .of_kind(SectionKind::DurationTop)
        .flat_map(parse_section)
        .collect()
}

/// `test call duration top` → `call duration`
pub fn duration_type(header: &str) -> String {
    header
        .split_whitespace()
        .filter(|word| !HEADER_NOISE_WORDS.contains(&word.to_ascii_lowercase().as_str()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_section(section: &Section<'_>) -> Vec<DurationRecord> {
    let label = duration_type(section.header);
    let mut columns: Option<Vec<Column>> = None;
    let mut records = Vec::new();

    for line in &section.lines {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }

        if tokens.contains(&CAPTION_TOKEN) {
            debug!("duration caption line skipped: {:?}", tokens.join(" "));
            continue;
        }

        if let Some(columns) = columns.as_deref() {
            records.push(parse_row(columns, &tokens, &label));
        } else {
            columns = Some(tokens.iter().map(|t| Column::from_header(t)).collect());
        }
    }

    if columns.is_none() {
        debug!("duration section {:?} has no column header", section.header);
    }

    records
}

fn parse_row(columns: &[Column], tokens: &[&str], label: &str) -> DurationRecord {
    let cells = align_cells(columns, tokens);

    let mut record = DurationRecord {
        name: None,
        category: None,
        arguments: None,
        duration_type: label.to_string(),
        num: None,
        avg: None,
        min: None,
        total: None,
        database_id: UNKNOWN_RUN_ID,
    };

    for (column, cell) in columns.iter().zip(cells) {
        let Some(cell) = cell else {
            continue;
        };
        match column {
            Column::Name => {
                let (name, category, arguments) = split_test_id(&cell);
                record.name = name;
                record.category = category.map(str::to_string);
                record.arguments = arguments.map(str::to_string);
            }
            Column::Num => record.num = cell.parse().ok(),
            Column::Avg => record.avg = Some(convert(&cell, "avg")),
            Column::Min => record.min = Some(convert(&cell, "min")),
            Column::Total => record.total = Some(convert(&cell, "total")),
            Column::Ignored => {}
        }
    }

    record
}

/// Zip row tokens against the columns
///
/// Surplus tokens are folded into the `name` column (test ids with spaces);
/// missing trailing cells stay `None`.
fn align_cells(columns: &[Column], tokens: &[&str]) -> Vec<Option<String>> {
    let surplus = tokens.len().saturating_sub(columns.len());
    let name_idx = columns.iter().position(|c| *c == Column::Name);

    let mut cells = Vec::with_capacity(columns.len());
    let mut cursor = 0;
    for idx in 0..columns.len() {
        let width = if surplus > 0 && Some(idx) == name_idx {
            surplus + 1
        } else {
            1
        };
        let end = (cursor + width).min(tokens.len());
        let cell = (cursor < end).then(|| tokens[cursor..end].join(" "));
        cells.push(cell);
        cursor = end;
    }
    cells
}

fn convert(cell: &str, column: &str) -> Seconds {
    let value = to_seconds(cell);
    if value == Seconds::Unknown {
        warn!("unrecognized {} duration {:?}", column, cell);
    }
    value
}
