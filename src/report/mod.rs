//! Summaries of the stored tables
//!
//! [`ExecutionSummary`] condenses the three tables into pass/fail counts per
//! category; [`SummaryReporter`] prints it, [`output`] serializes it.

pub mod metrics;
pub mod output;
pub mod reporter;

pub use metrics::{CategoryMetrics, ErrorFrequency, ExecutionSummary};
pub use output::{IngestOutput, JobsOutput, SummaryOutput};
pub use reporter::SummaryReporter;
