//! Error types with contextual suggestions
//!
//! Extraction itself never fails; these errors cover the I/O around it:
//! reading transcripts, loading and saving tables, reading configuration.
//!
//! # Examples
//!
//! ```
//! use pytest_digest::error::DigestError;
//! use std::path::PathBuf;
//!
//! let err = DigestError::LogNotFound {
//!     path: PathBuf::from("artifacts/run.useast1.1.log"),
//! };
//! assert_eq!(err.exit_code(), 66);
//! assert!(err.suggestion().is_some());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// pytest-digest errors
#[derive(Error, Debug)]
pub enum DigestError {
    /// Transcript file does not exist
    #[error("Log file not found: {path}")]
    LogNotFound {
        /// Path given on the command line
        path: PathBuf,
    },

    /// Transcript exists but could not be read
    #[error("Failed to read log file: {path}")]
    LogRead {
        /// Path of the transcript
        path: PathBuf,
        #[source]
        /// IO error source
        source: std::io::Error,
    },

    /// Persisted table could not be read
    #[error("Failed to read stored table: {path}")]
    StoreRead {
        /// Table file
        path: PathBuf,
        #[source]
        /// IO error source
        source: std::io::Error,
    },

    /// Persisted table is not valid table JSON
    #[error("Stored table is corrupt: {path}")]
    StoreCorrupt {
        /// Table file
        path: PathBuf,
        #[source]
        /// Parse error source
        source: serde_json::Error,
    },

    /// Persisted table holds rows of another kind
    #[error("Stored table {path} holds '{found}' rows, expected '{expected}'")]
    StoreKindMismatch {
        /// Table file
        path: PathBuf,
        /// Kind the caller asked for
        expected: String,
        /// Kind recorded in the file
        found: String,
    },

    /// Merged table could not be written
    #[error("Failed to write stored table: {path}")]
    StoreWrite {
        /// Table file
        path: PathBuf,
        #[source]
        /// IO error source
        source: std::io::Error,
    },

    /// Configuration file is invalid
    #[error("Invalid configuration in {path}: {message}")]
    ConfigInvalid {
        /// Config file
        path: PathBuf,
        /// What was wrong
        message: String,
    },

    /// No transcripts were given
    #[error("No log files to ingest")]
    NoInputs,
}

impl DigestError {
    /// Actionable suggestion for resolving this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::LogNotFound { path } => Some(format!(
                "Check the path {} or download the run artifacts first",
                path.display()
            )),
            Self::LogRead { path, .. } => Some(format!(
                "Check file permissions and that {} is a UTF-8 text file",
                path.display()
            )),
            Self::StoreRead { path, .. } => Some(format!(
                "Check file permissions and that {} is accessible",
                path.display()
            )),
            Self::StoreCorrupt { path, .. } | Self::StoreKindMismatch { path, .. } => {
                Some(format!(
                    "Move {} aside to start a fresh table; it will be recreated on the next ingest",
                    path.display()
                ))
            }
            Self::StoreWrite { path, .. } => Some(format!(
                "Ensure the store directory containing {} is writable, or pass --store",
                path.display()
            )),
            Self::ConfigInvalid { .. } => {
                Some("Fix or remove .pytest-digest.toml; every key is optional".to_string())
            }
            Self::NoInputs => {
                Some("Pass one or more log files: pytest-digest ingest <LOG>...".to_string())
            }
        }
    }

    /// Exit code following sysexits.h conventions
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::LogNotFound { .. } => 66, // EX_NOINPUT
            Self::LogRead { .. } => 66,     // EX_NOINPUT
            Self::StoreRead { .. } => 74,   // EX_IOERR
            Self::StoreCorrupt { .. } => 65, // EX_DATAERR
            Self::StoreKindMismatch { .. } => 65, // EX_DATAERR
            Self::StoreWrite { .. } => 73,  // EX_CANTCREAT
            Self::ConfigInvalid { .. } => 78, // EX_CONFIG
            Self::NoInputs => 64,           // EX_USAGE
        }
    }
}

/// Error formatter with colors and structured output
pub struct ErrorFormatter;

impl ErrorFormatter {
    /// Format error with its cause chain and suggestion
    pub fn format(error: &anyhow::Error) -> String {
        use console::style;

        let mut output = String::new();

        output.push_str(&format!("{} {}\n", style("error:").red().bold(), error));

        let mut source = error.source();
        let mut indent = 1;
        while let Some(err) = source {
            output.push_str(&format!(
                "{}{} {}\n",
                "  ".repeat(indent),
                style("caused by:").yellow(),
                err
            ));
            source = err.source();
            indent += 1;
        }

        if let Some(digest_error) = error.downcast_ref::<DigestError>() {
            if let Some(suggestion) = digest_error.suggestion() {
                output.push_str(&format!(
                    "\n{} {}\n",
                    style("help:").cyan().bold(),
                    suggestion
                ));
            }
        }

        output
    }

    /// Get exit code from error
    pub fn exit_code(error: &anyhow::Error) -> i32 {
        if let Some(digest_error) = error.downcast_ref::<DigestError>() {
            digest_error.exit_code()
        } else {
            1
        }
    }
}
