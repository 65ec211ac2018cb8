//! Configuration types for the schemawatch system
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main watch configuration
///
/// One instance describes one watched document: where to fetch it from and
/// where the audit trail (snapshots, diff reports, run log) lives on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// URL of the schema document to watch
    pub source_url: String,

    /// Directory holding the metadata record and the dated snapshots
    pub data_dir: PathBuf,

    /// Directory holding diff reports
    pub diffs_dir: PathBuf,

    /// Directory holding the run log
    pub logs_dir: PathBuf,
}

impl WatchConfig {
    /// Create a configuration for a source URL with the default directory layout
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            data_dir: PathBuf::from("data"),
            diffs_dir: PathBuf::from("diffs"),
            logs_dir: PathBuf::from("logs"),
        }
    }

    /// Root all three artifact directories under the given path
    pub fn rooted_at(mut self, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        self.data_dir = root.join("data");
        self.diffs_dir = root.join("diffs");
        self.logs_dir = root.join("logs");
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.source_url.is_empty() {
            return Err(crate::Error::config("Source URL cannot be empty"));
        }

        if !self.source_url.starts_with("https://") && !self.source_url.starts_with("http://") {
            return Err(crate::Error::config(format!(
                "Source URL must use HTTP or HTTPS scheme. Got: {}",
                self.source_url
            )));
        }

        for (name, dir) in [
            ("data_dir", &self.data_dir),
            ("diffs_dir", &self.diffs_dir),
            ("logs_dir", &self.logs_dir),
        ] {
            if dir.as_os_str().is_empty() {
                return Err(crate::Error::config(format!("{} cannot be empty", name)));
            }
        }

        Ok(())
    }
}

/// Transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Request timeout in seconds for the single fetch attempt
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl FetchConfig {
    /// Validate the transport configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if !(1..=300).contains(&self.timeout_secs) {
            return Err(crate::Error::config(format!(
                "Fetch timeout must be between 1 and 300 seconds. Got: {}",
                self.timeout_secs
            )));
        }
        Ok(())
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// Diff command configuration
///
/// The snapshot paths are appended to `args` when the tool is invoked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffCommandConfig {
    /// Program to execute (e.g. "diff")
    pub program: String,

    /// Leading arguments (e.g. ["-u"])
    #[serde(default)]
    pub args: Vec<String>,
}

impl DiffCommandConfig {
    /// Validate the diff command configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.program.is_empty() {
            return Err(crate::Error::config("Diff program cannot be empty"));
        }
        Ok(())
    }
}

impl Default for DiffCommandConfig {
    fn default() -> Self {
        Self {
            program: "diff".to_string(),
            args: vec!["-u".to_string()],
        }
    }
}
