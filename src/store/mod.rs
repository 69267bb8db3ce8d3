//! Persistent, deduplicated tables
//!
//! Each [`TableKind`](crate::record::TableKind) is kept as one file under the
//! store directory. [`MergeStore`] performs the load, merge, save cycle for
//! all three tables of an extraction batch.

mod merge;
mod storage;

pub use merge::Table;
pub use storage::{JsonTableStore, TableStore, DEFAULT_STORE_DIR};

use crate::extract::ExtractedTables;
use crate::record::{DurationRecord, FailureRecord, StatusRecord, TableKind, TableRow};
use anyhow::Result;
use log::info;
use serde::Serialize;

/// The three merged tables
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergedTables {
    /// Status table
    pub status: Table<StatusRecord>,
    /// Durations table
    pub durations: Table<DurationRecord>,
    /// Failures table
    pub failures: Table<FailureRecord>,
}

/// Row counts of one table before and after a merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    /// Table the counts refer to
    #[serde(serialize_with = "serialize_kind")]
    pub kind: TableKind,
    /// Rows persisted before the merge
    pub before: usize,
    /// Rows after the merge
    pub after: usize,
}

impl MergeStats {
    /// Rows the merge added
    pub fn added(&self) -> usize {
        self.after.saturating_sub(self.before)
    }
}

fn serialize_kind<S: serde::Serializer>(kind: &TableKind, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(kind.label())
}

/// Folds extraction batches into persisted tables
pub struct MergeStore<S: TableStore> {
    store: S,
}

impl<S: TableStore> MergeStore<S> {
    /// Merge into tables held by `store`
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying table store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Merge one table without saving it
    pub fn preview<R: TableRow>(&self, fresh: Vec<R>) -> Result<(Table<R>, MergeStats)> {
        let prior: Table<R> = self.store.load()?;
        let before = prior.len();
        let merged = prior.merged(fresh);
        let stats = MergeStats {
            kind: R::KIND,
            before,
            after: merged.len(),
        };
        Ok((merged, stats))
    }

    /// Merge one table and persist the result
    pub fn merge_and_save<R: TableRow>(&self, fresh: Vec<R>) -> Result<(Table<R>, MergeStats)> {
        let (merged, stats) = self.preview(fresh)?;
        self.store.save(&merged)?;
        info!(
            "{} table: {} rows ({} new)",
            stats.kind,
            stats.after,
            stats.added()
        );
        Ok((merged, stats))
    }

    /// Merge a whole extraction batch, saving unless `dry_run` is set
    pub fn merge_all(
        &self,
        batch: ExtractedTables,
        dry_run: bool,
    ) -> Result<(MergedTables, Vec<MergeStats>)> {
        let ExtractedTables {
            status,
            durations,
            failures,
        } = batch;

        let (status, s) = self.apply(status, dry_run)?;
        let (durations, d) = self.apply(durations, dry_run)?;
        let (failures, f) = self.apply(failures, dry_run)?;

        Ok((
            MergedTables {
                status,
                durations,
                failures,
            },
            vec![s, d, f],
        ))
    }

    fn apply<R: TableRow>(&self, fresh: Vec<R>, dry_run: bool) -> Result<(Table<R>, MergeStats)> {
        if dry_run {
            self.preview(fresh)
        } else {
            self.merge_and_save(fresh)
        }
    }

    /// Load all three persisted tables
    pub fn load_all(&self) -> Result<MergedTables> {
        Ok(MergedTables {
            status: self.store.load()?,
            durations: self.store.load()?,
            failures: self.store.load()?,
        })
    }
}
