//! Run identifier recovery from a log's storage path
//!
//! Artifact logs are stored as `<test>.<region>.<databaseId>.<ext>`, e.g.
//! `run.useast1.98765.log`.

use crate::record::UNKNOWN_RUN_ID;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Identifiers encoded in a log file name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId {
    /// Test suite label
    pub test: Option<String>,
    /// Region or environment label
    pub region: Option<String>,
    /// CI run id, [`UNKNOWN_RUN_ID`] when absent or not a number
    #[serde(rename = "databaseId")]
    pub database_id: i64,
}

impl RunId {
    /// Resolve the identifiers of a log path
    ///
    /// # Examples
    ///
    /// ```
    /// use pytest_digest::extract::RunId;
    ///
    /// let id = RunId::from_path("logs/run.useast1.98765.log");
    /// assert_eq!(id.database_id, 98765);
    ///
    /// let short = RunId::from_path("run.log");
    /// assert_eq!(short.database_id, 0);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let file_name = path
            .as_ref()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        // Drop the extension, then read up to three dot-separated components
        let stem = match file_name.rsplit_once('.') {
            Some((stem, _ext)) => stem,
            None => "",
        };
        let mut parts = stem.split('.').map(|p| (!p.is_empty()).then(|| p.to_string()));

        let test = parts.next().flatten();
        let region = parts.next().flatten();
        let database_id = parts
            .next()
            .flatten()
            .and_then(|raw| raw.parse::<i64>().ok())
            .unwrap_or(UNKNOWN_RUN_ID);

        Self {
            test,
            region,
            database_id,
        }
    }

    /// Whether a real run id was recovered
    pub fn is_known(&self) -> bool {
        self.database_id != UNKNOWN_RUN_ID
    }
}
