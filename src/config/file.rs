//! Configuration file data structures

use crate::extract::Segmenter;
use crate::store::DEFAULT_STORE_DIR;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = ".pytest-digest.toml";

/// pytest-digest configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Directory holding the persisted tables
    #[serde(rename = "store-dir", default = "default_store_dir")]
    pub store_dir: PathBuf,

    /// Extra boilerplate filtering
    #[serde(default, skip_serializing_if = "KeywordSettings::is_empty")]
    pub keywords: KeywordSettings,
}

fn default_store_dir() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_DIR)
}

/// Boilerplate keyword settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeywordSettings {
    /// Substrings whose lines are dropped in addition to the built-in set
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl KeywordSettings {
    fn is_empty(&self) -> bool {
        self.exclude.is_empty()
    }
}

impl ConfigFile {
    /// Check value constraints the TOML schema cannot express
    pub fn validate(&self) -> Result<()> {
        if self.store_dir.as_os_str().is_empty() {
            anyhow::bail!("store-dir cannot be empty");
        }
        if let Some(pos) = self.keywords.exclude.iter().position(|k| k.trim().is_empty()) {
            anyhow::bail!("keywords.exclude[{}] is blank and would drop every line", pos);
        }
        Ok(())
    }

    /// Segmenter with the configured extra exclusions
    pub fn segmenter(&self) -> Segmenter {
        Segmenter::new().with_exclusions(self.keywords.exclude.iter().cloned())
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            keywords: KeywordSettings::default(),
        }
    }
}
