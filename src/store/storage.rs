//! Table persistence (I/O)

use super::merge::Table;
use crate::error::DigestError;
use crate::infra::{FileSystem, RealFileSystem};
use crate::record::{TableKind, TableRow};
use anyhow::Result;
use log::debug;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

/// Default directory for persisted tables, relative to the working directory
pub const DEFAULT_STORE_DIR: &str = "bin";

/// Loads and saves whole tables by kind
pub trait TableStore {
    /// Load the persisted table, or an empty one if none exists yet
    fn load<R: TableRow>(&self) -> Result<Table<R>>;

    /// Replace the persisted table
    fn save<R: TableRow>(&self, table: &Table<R>) -> Result<()>;
}

#[derive(Serialize)]
struct TableFileOut<'a, R: Serialize> {
    table: &'a str,
    rows: &'a Table<R>,
}

#[derive(Deserialize)]
struct TableFileIn<R> {
    table: String,
    rows: Table<R>,
}

/// One pretty-printed JSON file per table under a store directory
#[derive(Debug, Clone)]
pub struct JsonTableStore<FS: FileSystem = RealFileSystem> {
    dir: PathBuf,
    fs: FS,
}

impl JsonTableStore<RealFileSystem> {
    /// Store rooted at `dir` on the real filesystem
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_fs(dir, RealFileSystem)
    }
}

impl<FS: FileSystem> JsonTableStore<FS> {
    /// Store rooted at `dir` with a custom filesystem implementation
    pub fn with_fs(dir: impl Into<PathBuf>, fs: FS) -> Self {
        Self {
            dir: dir.into(),
            fs,
        }
    }

    /// Store directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name of a table, e.g. `pytest.status.json`
    pub fn file_name(kind: TableKind) -> String {
        format!("pytest.{}.json", kind.label())
    }

    /// Full path of a table file
    pub fn table_path(&self, kind: TableKind) -> PathBuf {
        self.dir.join(Self::file_name(kind))
    }
}

impl<FS: FileSystem> TableStore for JsonTableStore<FS> {
    fn load<R: TableRow>(&self) -> Result<Table<R>> {
        let path = self.table_path(R::KIND);

        let contents = match self.fs.read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no stored {} table at {}, starting empty", R::KIND, path.display());
                return Ok(Table::new());
            }
            Err(source) => return Err(DigestError::StoreRead { path, source }.into()),
        };

        let file: TableFileIn<R> = match serde_json::from_str(&contents) {
            Ok(file) => file,
            Err(source) => return Err(DigestError::StoreCorrupt { path, source }.into()),
        };

        if file.table != R::KIND.label() {
            return Err(DigestError::StoreKindMismatch {
                path,
                expected: R::KIND.label().to_string(),
                found: file.table,
            }
            .into());
        }

        debug!("loaded {} {} rows from {}", file.rows.len(), R::KIND, path.display());
        Ok(file.rows)
    }

    fn save<R: TableRow>(&self, table: &Table<R>) -> Result<()> {
        let path = self.table_path(R::KIND);
        let write_err = |source: io::Error| DigestError::StoreWrite {
            path: path.clone(),
            source,
        };

        self.fs.create_dir_all(&self.dir).map_err(write_err)?;

        let contents = serde_json::to_string_pretty(&TableFileOut {
            table: R::KIND.label(),
            rows: table,
        })
        .map_err(|e| write_err(io::Error::other(e)))?;

        // Readers never observe a half-written table
        let staging = path.with_extension("json.tmp");
        self.fs.write(&staging, contents).map_err(write_err)?;
        self.fs.rename(&staging, &path).map_err(write_err)?;

        debug!("saved {} {} rows to {}", table.len(), R::KIND, path.display());
        Ok(())
    }
}
