//! Log ingestion: read, extract in parallel, merge once

use crate::error::DigestError;
use crate::extract::{ExtractedTables, LogDocument, LogExtractor, RunId};
use crate::infra::{FileSystem, RealFileSystem};
use crate::store::{JsonTableStore, MergeStats, MergeStore, MergedTables};
use anyhow::Result;
use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};

/// Rows extracted from one transcript
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentReport {
    /// Transcript path
    pub path: PathBuf,
    /// Identifiers resolved from the path
    pub run: RunId,
    /// Status rows extracted
    pub status: usize,
    /// Duration rows extracted
    pub durations: usize,
    /// Failure rows extracted, placeholder included
    pub failures: usize,
}

/// Outcome of one ingest batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestReport {
    /// Per-transcript extraction counts, in input order
    pub documents: Vec<DocumentReport>,
    /// Per-table merge counts
    pub stats: Vec<MergeStats>,
    /// Tables after the merge
    #[serde(skip)]
    pub tables: MergedTables,
    /// Whether saving was skipped
    pub dry_run: bool,
}

/// Folds pytest transcripts into the persisted tables
pub struct Ingestor<FS: FileSystem + Clone = RealFileSystem> {
    fs: FS,
    extractor: LogExtractor,
    merger: MergeStore<JsonTableStore<FS>>,
}

impl Ingestor<RealFileSystem> {
    /// Ingest into tables under `store_dir` on the real filesystem
    pub fn new(store_dir: impl Into<PathBuf>, extractor: LogExtractor) -> Self {
        Self::with_fs(store_dir, extractor, RealFileSystem)
    }
}

impl<FS: FileSystem + Clone + Sync> Ingestor<FS> {
    /// Ingest with a custom filesystem implementation
    pub fn with_fs(store_dir: impl Into<PathBuf>, extractor: LogExtractor, fs: FS) -> Self {
        let store = JsonTableStore::with_fs(store_dir, fs.clone());
        Self {
            fs,
            extractor,
            merger: MergeStore::new(store),
        }
    }

    /// Merge store backing this ingestor
    pub fn merger(&self) -> &MergeStore<JsonTableStore<FS>> {
        &self.merger
    }

    /// Read a transcript into a sanitized document
    pub fn read_document(&self, path: &Path) -> Result<LogDocument> {
        let raw = self.fs.read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                DigestError::LogNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                DigestError::LogRead {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Ok(LogDocument::new(&raw, path))
    }

    /// Extract every transcript, then merge all rows into the stored tables
    ///
    /// Transcripts are read and parsed in parallel; the merge and the single
    /// write per table happen afterwards, in input order. Nothing is saved
    /// when any transcript cannot be read.
    pub fn ingest<P: AsRef<Path> + Sync>(&self, paths: &[P], dry_run: bool) -> Result<IngestReport> {
        if paths.is_empty() {
            return Err(DigestError::NoInputs.into());
        }

        let extracted: Vec<(DocumentReport, ExtractedTables)> = paths
            .par_iter()
            .map(|path| -> Result<(DocumentReport, ExtractedTables)> {
                let doc = self.read_document(path.as_ref())?;
                let tables = self.extractor.extract(&doc);
                let report = DocumentReport {
                    path: doc.path().to_path_buf(),
                    run: doc.run().clone(),
                    status: tables.status.len(),
                    durations: tables.durations.len(),
                    failures: tables.failures.len(),
                };
                Ok((report, tables))
            })
            .collect::<Result<_>>()?;

        let mut documents = Vec::with_capacity(extracted.len());
        let mut batch = ExtractedTables::default();
        for (report, tables) in extracted {
            debug!("queued {} for merge", report.path.display());
            batch.status.extend(tables.status);
            batch.durations.extend(tables.durations);
            batch.failures.extend(tables.failures);
            documents.push(report);
        }

        let (tables, stats) = self.merger.merge_all(batch, dry_run)?;
        info!(
            "ingested {} log file(s){}",
            documents.len(),
            if dry_run { " (dry run)" } else { "" }
        );

        Ok(IngestReport {
            documents,
            stats,
            tables,
            dry_run,
        })
    }
}
