//! Test fixtures: transcripts, run views and workspaces
//!
//! Transcripts mirror what pytest prints on GitHub Actions, terminal escapes
//! included.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Re-export anyhow for convenience
pub use anyhow;

/// A standard run: session table, two duration tables, short summary
pub const S3_LOG: &str = "\
\x1b[1m============================= test session starts ==============================\x1b[0m
platform linux -- Python 3.12.3, pytest-8.2.0, pluggy-1.5.0
rootdir: /home/runner/work/cloud-tests/cloud-tests
plugins: durations-1.2.0, xdist-3.6.1
collected 6 items / 1 deselected / 5 selected

\x1b[32mPASSED\x1b[0m tests/test_s3.py::TestBucket::test_create[us-east-1]
\x1b[32mPASSED\x1b[0m tests/test_s3.py::TestBucket::test_create[sa-east-1]
\x1b[31mFAILED\x1b[0m tests/test_s3.py::TestObject::test_upload[10mb]
\x1b[31mERROR\x1b[0m tests/test_s3.py::TestObject::test_download
\x1b[33mSKIPPED\x1b[0m tests/test_s3.py::test_acl

============================= fixture duration top =============================
total          name                 num avg            min
0:00:01.200000 s3_client              5 0:00:00.240000 0:00:00.200000
0:00:00.100000 bucket_name            5 0:00:00.020000 0:00:00.010000
0:00:01.300000 grand total           10 0:00:00.130000 0:00:00.010000
============================ test call duration top ============================
total          name                                       num avg            min
0:00:04.500000 tests/test_s3.py::TestBucket::test_create    2 0:00:02.250000 0:00:02.000000
0:00:02.000000 tests/test_s3.py::TestObject::test_upload    1 0:00:02.000000 0:00:02.000000
0:00:06.500000 grand total                                  3 0:00:02.166667 0:00:02.000000
=========================== short test summary info ============================
\x1b[31mFAILED\x1b[0m tests/test_s3.py::TestObject::test_upload[10mb] - botocore.exceptions.ClientError: An error occurred (EntityTooLarge)
\x1b[31mERROR\x1b[0m tests/test_s3.py::TestObject::test_download - KeyError: 'ETag'
\x1b[31m====== 1 failed, 2 passed, 1 skipped, 1 deselected, 1 error in 9.87s ======\x1b[0m
";

/// A run with live logging enabled: no usable session table
pub const LIVE_LOG: &str = "\
============================= test session starts ==============================
collected 1 item

tests/test_iam.py::test_create_role
-------------------------------- live log call ---------------------------------
INFO     botocore.credentials:credentials.py:1075 Found credentials in environment variables.
PASSED                                                                   [100%]
=========================== short test summary info ============================
FAILED tests/test_iam.py::test_delete_role - AssertionError: role still exists
";

/// Output that pytest never produced
pub const NOT_A_PYTEST_LOG: &str = "make: *** [Makefile:12: all] Error 2\n";

/// `gh run view` output for a run with one failed job
pub const RUN_VIEW: &str = "\
\x1b[31mX\x1b[0m main cloud-tests · 9876543210
Triggered via schedule about 3 hours ago

JOBS
\x1b[32m✓\x1b[0m test-s3 / build in 2m15s (ID 26101)
\x1b[31mX\x1b[0m test-ec2 / build in 4m2s (ID 26102)
  \x1b[31mX\x1b[0m Run pytest

ANNOTATIONS
X Process completed with exit code 1.
";

/// A workspace directory holding named files
pub struct Workspace {
    /// Kept alive for the test duration
    pub dir: TempDir,
}

impl Workspace {
    /// Create an empty workspace
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    /// Write a file relative to the workspace root
    pub fn write(&self, name: &str, contents: &str) -> anyhow::Result<PathBuf> {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// Path of the default table store
    pub fn store(&self) -> PathBuf {
        self.dir.path().join("bin")
    }

    /// Read and parse a stored table file
    pub fn table_json(&self, file: &str) -> anyhow::Result<serde_json::Value> {
        let text = fs::read_to_string(self.store().join(file))?;
        Ok(serde_json::from_str(&text)?)
    }
}
