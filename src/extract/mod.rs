//! pytest transcript extraction
//!
//! Turns one raw transcript into three record sequences:
//!
//! 1. [`sanitize`] strips terminal escapes
//! 2. [`Segmenter`] splits the text into named sections
//! 3. [`parse_status`], [`parse_durations`] and [`parse_failures`] read the
//!    sections they care about
//! 4. every record is stamped with the [`RunId`] recovered from the log path
//!
//! Extraction never fails; unrecognized content yields empty or placeholder
//! output instead.
//!
//! # Examples
//!
//! ```
//! use pytest_digest::extract::{LogDocument, LogExtractor};
//!
//! let raw = "\
//! ===== test session starts =====
//! PASSED test_s3::test_put[bucket]
//! ===== short test summary info =====
//! FAILED test_s3::test_get - KeyError: 'etag'
//! ";
//! let doc = LogDocument::new(raw, "artifacts/s3.useast1.4242.log");
//! let tables = LogExtractor::new().extract(&doc);
//!
//! assert_eq!(tables.status.len(), 1);
//! assert_eq!(tables.status[0].database_id, 4242);
//! assert_eq!(tables.failures[0].error.as_deref(), Some("KeyError"));
//! ```

mod ansi;
mod durations;
mod failures;
mod identifier;
mod sections;
mod status;
mod test_line;
mod timespan;

pub use ansi::sanitize;
pub use durations::{duration_type, parse_durations};
pub use failures::parse_failures;
pub use identifier::RunId;
pub use sections::{
    LogMode, Section, SectionKind, SectionRule, Segmenter, Segments, EXCLUDED_KEYWORDS,
    LIVE_LOG_MARKER, SECTION_RULES,
};
pub use status::parse_status;
pub use timespan::{build_time_secs, parse_timespan, to_seconds};

use crate::record::{DurationRecord, FailureRecord, StatusRecord, TableRow};
use log::debug;
use std::path::{Path, PathBuf};

/// A sanitized transcript and the identifiers of the run it came from
#[derive(Debug, Clone)]
pub struct LogDocument {
    path: PathBuf,
    text: String,
    run: RunId,
    mode: LogMode,
}

impl LogDocument {
    /// Sanitize raw transcript text read from `path`
    pub fn new(raw: &str, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let text = sanitize(raw).into_owned();
        let mode = LogMode::detect(&text);
        Self {
            path: path.to_path_buf(),
            run: RunId::from_path(path),
            text,
            mode,
        }
    }

    /// Path the transcript was read from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sanitized text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Identifiers resolved from the path
    pub fn run(&self) -> &RunId {
        &self.run
    }

    /// Document layout
    pub fn mode(&self) -> LogMode {
        self.mode
    }
}

/// The three record sequences of one transcript
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedTables {
    /// Per-test status rows
    pub status: Vec<StatusRecord>,
    /// Timing rows
    pub durations: Vec<DurationRecord>,
    /// Failure rows, possibly a single placeholder
    pub failures: Vec<FailureRecord>,
}

/// Runs the extraction pipeline over documents
#[derive(Debug, Clone, Default)]
pub struct LogExtractor {
    segmenter: Segmenter,
}

impl LogExtractor {
    /// Extractor with the built-in section vocabulary and exclusions
    pub fn new() -> Self {
        Self::with_segmenter(Segmenter::new())
    }

    /// Extractor using a customized segmenter
    pub fn with_segmenter(segmenter: Segmenter) -> Self {
        Self { segmenter }
    }

    /// Extract all three tables from a document
    pub fn extract(&self, doc: &LogDocument) -> ExtractedTables {
        let segments = self.segmenter.segment_with_mode(doc.text(), doc.mode());
        let database_id = doc.run().database_id;

        let tables = ExtractedTables {
            status: stamped(parse_status(&segments), database_id),
            durations: stamped(parse_durations(&segments), database_id),
            failures: stamped(parse_failures(&segments), database_id),
        };

        debug!(
            "{}: {} status, {} duration, {} failure rows (run {})",
            doc.path().display(),
            tables.status.len(),
            tables.durations.len(),
            tables.failures.len(),
            database_id
        );

        tables
    }
}

fn stamped<R: TableRow>(mut rows: Vec<R>, database_id: i64) -> Vec<R> {
    for row in &mut rows {
        row.attach_run(database_id);
    }
    rows
}
