//! Table row types produced by log extraction
//!
//! Every row carries the `database_id` of the CI run it came from, so the
//! same test name observed in two runs stays two distinct rows after merge.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Database id used when a log path carries no usable run id
pub const UNKNOWN_RUN_ID: i64 = 0;

/// Outcome keyword printed by pytest for a single test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestStatus {
    /// Test passed
    Passed,
    /// Test assertion failed
    Failed,
    /// Test errored in setup/teardown or collection
    Error,
    /// Test was skipped
    Skipped,
}

impl TestStatus {
    /// Every status, in the order pytest documents them
    pub const ALL: [TestStatus; 4] = [
        TestStatus::Passed,
        TestStatus::Failed,
        TestStatus::Error,
        TestStatus::Skipped,
    ];

    /// The keyword as printed in the transcript
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
            Self::Error => "ERROR",
            Self::Skipped => "SKIPPED",
        }
    }

    /// Parse an exact transcript keyword
    pub fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.keyword() == word)
    }

    /// Whether this status belongs in the failure table
    pub fn is_failure(self) -> bool {
        matches!(self, Self::Failed | Self::Error)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A duration cell converted to seconds
///
/// Serialized as a plain number, or the string `"unknown"` when the
/// transcript value could not be converted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Seconds {
    /// Non-negative seconds, rounded to milliseconds
    Known(f64),
    /// The transcript held a value that is not a recognizable duration
    Unknown,
}

impl Seconds {
    const UNKNOWN_MARKER: &'static str = "unknown";

    /// Build a known value, rounding to 3 decimals
    ///
    /// Negative and non-finite inputs become [`Seconds::Unknown`].
    pub fn from_secs(secs: f64) -> Self {
        if !secs.is_finite() || secs < 0.0 {
            return Self::Unknown;
        }
        Self::Known((secs * 1000.0).round() / 1000.0)
    }

    /// The numeric value, if known
    pub fn as_f64(self) -> Option<f64> {
        match self {
            Self::Known(v) => Some(v),
            Self::Unknown => None,
        }
    }
}

impl Serialize for Seconds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Known(v) => serializer.serialize_f64(*v),
            Self::Unknown => serializer.serialize_str(Self::UNKNOWN_MARKER),
        }
    }
}

impl<'de> Deserialize<'de> for Seconds {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(v) => Ok(Seconds::from_secs(v)),
            Raw::Text(s) if s == Self::UNKNOWN_MARKER => Ok(Seconds::Unknown),
            Raw::Text(s) => Err(serde::de::Error::custom(format!(
                "expected seconds or \"{}\", got \"{}\"",
                Self::UNKNOWN_MARKER,
                s
            ))),
        }
    }
}

/// The three tables produced from one transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    /// Per-test status rows
    Status,
    /// Per-category timing rows
    Durations,
    /// Per-test failure detail rows
    Failures,
}

impl TableKind {
    /// All table kinds
    pub const ALL: [TableKind; 3] = [TableKind::Status, TableKind::Durations, TableKind::Failures];

    /// Short label used in logs and reports
    pub fn label(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Durations => "durations",
            Self::Failures => "failures",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A row type that can live in a persisted table
pub trait TableRow: Serialize + for<'de> Deserialize<'de> + Clone {
    /// Which table this row belongs to
    const KIND: TableKind;

    /// Stamp the run identifier onto a freshly parsed row
    fn attach_run(&mut self, database_id: i64);

    /// The run identifier currently attached
    fn database_id(&self) -> i64;

    /// Whether the row carries enough information to be persisted
    fn is_retained(&self) -> bool {
        true
    }
}

/// One executed test from the session table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    /// Test name (module path), with embedded whitespace removed
    pub name: String,
    /// Outcome keyword
    pub status: TestStatus,
    /// Test class or function following `::`
    pub category: Option<String>,
    /// Parametrization tail after `[`, closing bracket included
    pub arguments: Option<String>,
    /// Run the row was observed in
    #[serde(rename = "databaseId")]
    pub database_id: i64,
}

impl TableRow for StatusRecord {
    const KIND: TableKind = TableKind::Status;

    fn attach_run(&mut self, database_id: i64) {
        self.database_id = database_id;
    }

    fn database_id(&self) -> i64 {
        self.database_id
    }
}

/// One row of a `pytest-durations` timing table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationRecord {
    /// Fixture or test name, when the table has a `name` column
    pub name: Option<String>,
    /// Part of the test id after `::`, when present
    pub category: Option<String>,
    /// Parametrization tail after `[`, closing bracket included
    #[serde(default)]
    pub arguments: Option<String>,
    /// Table label, e.g. `"call duration"` or `"fixture duration"`
    #[serde(rename = "durationType")]
    pub duration_type: String,
    /// Number of calls measured
    pub num: Option<u64>,
    /// Average time
    pub avg: Option<Seconds>,
    /// Minimum time
    pub min: Option<Seconds>,
    /// Total time
    pub total: Option<Seconds>,
    /// Run the row was observed in
    #[serde(rename = "databaseId")]
    pub database_id: i64,
}

impl TableRow for DurationRecord {
    const KIND: TableKind = TableKind::Durations;

    fn attach_run(&mut self, database_id: i64) {
        self.database_id = database_id;
    }

    fn database_id(&self) -> i64 {
        self.database_id
    }
}

/// One failing or erroring test from the short summary
///
/// All fields are optional at parse time; [`FailureRecord::is_diagnostic`]
/// decides whether the row is kept in the failure table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Test name (module path)
    pub name: Option<String>,
    /// `FAILED` or `ERROR`
    pub status: Option<TestStatus>,
    /// Test class or function following `::`
    pub category: Option<String>,
    /// Exception or error type, e.g. `ValueError`
    pub error: Option<String>,
    /// Message following the error type
    pub error_details: Option<String>,
    /// Run the row was observed in
    #[serde(rename = "databaseId")]
    pub database_id: i64,
}

impl FailureRecord {
    /// A record with every field absent
    pub fn placeholder() -> Self {
        Self {
            name: None,
            status: None,
            category: None,
            error: None,
            error_details: None,
            database_id: UNKNOWN_RUN_ID,
        }
    }

    /// Whether the row identifies a test and carries an error type and details
    pub fn is_diagnostic(&self) -> bool {
        let present = |f: &Option<String>| f.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.name) && present(&self.error) && present(&self.error_details)
    }
}

impl TableRow for FailureRecord {
    const KIND: TableKind = TableKind::Failures;

    fn attach_run(&mut self, database_id: i64) {
        self.database_id = database_id;
    }

    fn database_id(&self) -> i64 {
        self.database_id
    }

    fn is_retained(&self) -> bool {
        self.is_diagnostic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_keyword_round_trips_through_from_keyword() {
        for status in TestStatus::ALL {
            assert_eq!(TestStatus::from_keyword(status.keyword()), Some(status));
        }
        assert_eq!(TestStatus::from_keyword("passed"), None);
    }

    #[test]
    fn test_status_serializes_uppercase() {
        let json = serde_json::to_string(&TestStatus::Skipped).unwrap();
        assert_eq!(json, "\"SKIPPED\"");
    }

    #[test]
    fn test_seconds_from_secs_rounds_to_milliseconds() {
        assert_eq!(Seconds::from_secs(1.23456), Seconds::Known(1.235));
        assert_eq!(Seconds::from_secs(0.0), Seconds::Known(0.0));
    }

    #[test]
    fn test_seconds_from_negative_is_unknown() {
        assert_eq!(Seconds::from_secs(-1.0), Seconds::Unknown);
        assert_eq!(Seconds::from_secs(f64::NAN), Seconds::Unknown);
    }

    #[test]
    fn test_seconds_unknown_serializes_as_marker() {
        let json = serde_json::to_string(&vec![Seconds::Known(1.5), Seconds::Unknown]).unwrap();
        assert_eq!(json, "[1.5,\"unknown\"]");

        let back: Vec<Seconds> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![Seconds::Known(1.5), Seconds::Unknown]);
    }

    #[test]
    fn test_seconds_rejects_unrelated_text() {
        let result: Result<Seconds, _> = serde_json::from_str("\"soon\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_failure_placeholder_is_not_diagnostic() {
        assert!(!FailureRecord::placeholder().is_diagnostic());
    }

    #[test]
    fn test_failure_with_error_and_details_is_diagnostic() {
        let record = FailureRecord {
            name: Some("test_foo".to_string()),
            status: Some(TestStatus::Failed),
            category: Some("TestBar".to_string()),
            error: Some("ValueError".to_string()),
            error_details: Some("bad input".to_string()),
            database_id: 1,
        };
        assert!(record.is_diagnostic());

        let no_details = FailureRecord {
            error_details: Some(String::new()),
            ..record
        };
        assert!(!no_details.is_diagnostic());
    }
}
