//! Common test utilities and helpers
//!
//! - Sample pytest transcripts and CI run views
//! - Workspace creation with logs written under their CI file names
//! - Assertion helpers for float comparisons

pub mod assertions;
pub mod fixtures;

/// Check if running in CI environment
#[allow(dead_code)]
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok() || std::env::var("GITHUB_ACTIONS").is_ok()
}
