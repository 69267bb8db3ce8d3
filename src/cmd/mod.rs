//! Command handlers for the pytest-digest CLI
//!
//! Each submodule handles one subcommand.

pub mod completions;
pub mod ingest;
pub mod jobs;
pub mod summary;

pub use completions::cmd_completions;
pub use ingest::cmd_ingest;
pub use jobs::cmd_jobs;
pub use summary::cmd_summary;
