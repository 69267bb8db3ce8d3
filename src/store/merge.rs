//! Set-union merge of freshly extracted rows into a persisted table

use crate::record::TableRow;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An ordered, duplicate-free collection of rows of one kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table<R> {
    rows: Vec<R>,
}

impl<R> Table<R> {
    /// Empty table
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Rows in stored order
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Iterate rows in stored order
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Take ownership of the rows
    pub fn into_rows(self) -> Vec<R> {
        self.rows
    }
}

impl<R: TableRow> Table<R> {
    /// Build a table from arbitrary rows, applying the retention filter and
    /// collapsing duplicates
    pub fn from_rows(rows: impl IntoIterator<Item = R>) -> Self {
        Self::new().merged(rows)
    }

    /// Union with `fresh`, keeping existing rows first
    ///
    /// Rows rejected by [`TableRow::is_retained`] are dropped from both
    /// inputs, so stored rows that no longer qualify (a hand-edited failure
    /// placeholder) are cleaned on the next merge. Two rows are duplicates
    /// when every field, `databaseId` included, is equal.
    /// Merging the same rows twice leaves the table unchanged.
    pub fn merged(self, fresh: impl IntoIterator<Item = R>) -> Self {
        let mut seen = HashSet::new();
        let mut rows = Vec::with_capacity(self.rows.len());

        for row in self.rows.into_iter().chain(fresh) {
            if !row.is_retained() {
                continue;
            }
            let unseen = match row_key(&row) {
                Some(key) => seen.insert(key),
                None => true,
            };
            if unseen {
                rows.push(row);
            }
        }

        Self { rows }
    }
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, R> IntoIterator for &'a Table<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Identity of a row for duplicate detection
///
/// Field order is fixed by the derive, so the compact JSON encoding is a
/// stable key. A row that cannot be encoded never compares equal to anything.
fn row_key<R: TableRow>(row: &R) -> Option<String> {
    match serde_json::to_string(row) {
        Ok(key) => Some(key),
        Err(e) => {
            warn!("{} row could not be encoded for dedup: {}", R::KIND, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{FailureRecord, StatusRecord, TestStatus};
    use proptest::prelude::*;

    fn status(name: &str, status: TestStatus, run: i64) -> StatusRecord {
        StatusRecord {
            name: name.to_string(),
            status,
            category: Some("test_case".to_string()),
            arguments: None,
            database_id: run,
        }
    }

    fn failure(name: &str, error: Option<&str>, details: Option<&str>) -> FailureRecord {
        FailureRecord {
            name: Some(name.to_string()),
            status: Some(TestStatus::Failed),
            category: None,
            error: error.map(str::to_string),
            error_details: details.map(str::to_string),
            database_id: 9,
        }
    }

    #[test]
    fn test_merged_keeps_prior_rows_first() {
        let prior = Table::from_rows(vec![status("b", TestStatus::Passed, 1)]);
        let merged = prior.merged(vec![status("a", TestStatus::Passed, 2)]);

        let names: Vec<_> = merged.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_merged_collapses_exact_duplicates() {
        let row = status("a", TestStatus::Failed, 1);
        let merged = Table::from_rows(vec![row.clone()]).merged(vec![row.clone(), row]);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_merged_keeps_same_test_from_different_runs() {
        let merged = Table::from_rows(vec![status("a", TestStatus::Passed, 1)])
            .merged(vec![status("a", TestStatus::Passed, 2)]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merged_is_idempotent() {
        let fresh = vec![
            status("a", TestStatus::Passed, 1),
            status("b", TestStatus::Skipped, 1),
        ];
        let once = Table::new().merged(fresh.clone());
        let twice = once.clone().merged(fresh);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_from_rows_drops_non_diagnostic_failures() {
        let table = Table::from_rows(vec![
            FailureRecord::placeholder(),
            failure("test_a", Some("ValueError"), Some("bad")),
            failure("test_b", Some("ValueError"), None),
            failure("test_c", None, None),
        ]);

        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].name.as_deref(), Some("test_a"));
    }

    #[test]
    fn test_merged_drops_stored_rows_that_no_longer_qualify() {
        let stored = serde_json::to_value(vec![
            FailureRecord::placeholder(),
            failure("test_a", Some("KeyError"), Some("'ETag'")),
        ])
        .unwrap();
        let prior: Table<FailureRecord> = serde_json::from_value(stored).unwrap();
        assert_eq!(prior.len(), 2);

        let merged = prior.merged(Vec::new());
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.rows()[0].name.as_deref(), Some("test_a"));
    }

    #[test]
    fn test_table_serializes_as_plain_array() {
        let table = Table::from_rows(vec![status("a", TestStatus::Passed, 3)]);
        let json = serde_json::to_value(&table).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["databaseId"], 3);
    }

    fn arb_status() -> impl Strategy<Value = StatusRecord> {
        (
            "[a-c]{1,2}",
            prop::sample::select(TestStatus::ALL.to_vec()),
            0i64..3,
        )
            .prop_map(|(name, s, run)| status(&name, s, run))
    }

    proptest! {
        #[test]
        fn prop_merge_twice_equals_merge_once(
            prior in prop::collection::vec(arb_status(), 0..12),
            fresh in prop::collection::vec(arb_status(), 0..12),
        ) {
            let once = Table::from_rows(prior).merged(fresh.clone());
            let twice = once.clone().merged(fresh);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_merged_rows_are_unique(rows in prop::collection::vec(arb_status(), 0..24)) {
            let table = Table::from_rows(rows.clone());
            for (i, a) in table.iter().enumerate() {
                for b in table.rows()[i + 1..].iter() {
                    prop_assert_ne!(a, b);
                }
            }
            for row in &rows {
                prop_assert!(table.rows().contains(row));
            }
        }
    }
}
