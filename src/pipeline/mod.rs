//! Ingestion pipeline
//!
//! 1. read every transcript through [`FileSystem`](crate::infra::FileSystem)
//! 2. extract the three tables per transcript, in parallel
//! 3. merge all rows into the stored tables in one sequential step
//! 4. write each table once (skipped on dry runs)

pub mod ingestor;

pub use ingestor::{DocumentReport, IngestReport, Ingestor};
