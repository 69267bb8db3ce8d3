#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! pytest-digest library
//!
//! Turns raw pytest console transcripts into three tables (per-test status,
//! `pytest-durations` timing rows, failure details) and folds them into
//! deduplicated tables that accumulate across CI runs.
//!
//! # Basic Example
//!
//! Extracting the tables of one transcript:
//!
//! ```
//! use pytest_digest::extract::{LogDocument, LogExtractor};
//! use pytest_digest::record::TestStatus;
//!
//! let raw = "\
//! ============ test session starts ============
//! PASSED tests/test_s3.py::test_put[small]
//! SKIPPED tests/test_s3.py::test_acl
//! ";
//! let doc = LogDocument::new(raw, "logs/s3.useast1.98765.log");
//! let tables = LogExtractor::new().extract(&doc);
//!
//! assert_eq!(tables.status.len(), 2);
//! assert_eq!(tables.status[0].arguments.as_deref(), Some("small]"));
//! assert_eq!(tables.status[1].status, TestStatus::Skipped);
//! assert_eq!(doc.run().region.as_deref(), Some("useast1"));
//! ```
//!
//! # Advanced Example: Accumulating Runs
//!
//! Merging two runs into a JSON store; re-ingesting a run changes nothing:
//!
//! ```
//! use pytest_digest::extract::{LogDocument, LogExtractor};
//! use pytest_digest::store::{JsonTableStore, MergeStore};
//! use tempfile::TempDir;
//!
//! let dir = TempDir::new().unwrap();
//! let merger = MergeStore::new(JsonTableStore::new(dir.path()));
//! let extractor = LogExtractor::new();
//! let raw = "=== test session starts ===\nFAILED t.py::test_get\n";
//!
//! for path in ["s3.useast1.1.log", "s3.useast1.2.log", "s3.useast1.1.log"] {
//!     let tables = extractor.extract(&LogDocument::new(raw, path));
//!     merger.merge_all(tables, false).unwrap();
//! }
//!
//! let stored = merger.load_all().unwrap();
//! assert_eq!(stored.status.len(), 2);
//! ```

/// Command handlers for CLI operations
pub mod cmd;
/// Configuration file support
pub mod config;
/// Error types with contextual suggestions
pub mod error;
/// Transcript sanitizing, segmentation and table extraction
pub mod extract;
/// Shared formatting utilities
pub mod fmt;
/// Filesystem abstraction
pub mod infra;
/// CI run view parsing
pub mod jobs;
/// Ingestion pipeline
pub mod pipeline;
/// Table row types
pub mod record;
/// Execution summaries and output formats
pub mod report;
/// Persisted, deduplicated tables
pub mod store;
