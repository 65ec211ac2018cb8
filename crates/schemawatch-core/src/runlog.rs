//! Run log
//!
//! Append-only, line-oriented log with exactly one entry per invocation:
//! `[<RFC 3339 UTC>] <TAG> <details>`. Together with the process exit code
//! this is the entire user-visible surface of a run.

use chrono::{SecondsFormat, Utc};
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::Error;

/// File name of the run log inside the logs directory
pub const RUN_LOG_FILE: &str = "runs.log";

/// Terminal outcome of a successful run
///
/// Failures are not an outcome: they travel as `Err` and are tagged `ERROR`
/// in the log by the engine before propagating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Server honored a precondition; nothing fetched, metadata untouched
    NotModified,

    /// Body fetched but hash matched the latest snapshot; validators refreshed
    Unchanged,

    /// New content archived
    Saved {
        /// File name of the new snapshot
        snapshot: String,
        /// Hash prefix used in the snapshot name
        hash_prefix: String,
    },
}

impl RunOutcome {
    /// Log tag for this outcome
    pub fn tag(&self) -> &'static str {
        match self {
            RunOutcome::NotModified => "NOT_MODIFIED",
            RunOutcome::Unchanged => "UNCHANGED",
            RunOutcome::Saved { .. } => "SAVED",
        }
    }
}

/// Append-only run log
#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    /// Create a handle for the run log inside the given logs directory
    pub fn new(logs_dir: &Path) -> Self {
        Self {
            path: logs_dir.join(RUN_LOG_FILE),
        }
    }

    /// Create the logs directory if it does not exist
    pub async fn ensure_dir(&self) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Error::run_log(format!(
                    "Failed to create logs directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Append one timestamped line
    pub async fn append(&self, line: &str) -> Result<(), Error> {
        let entry = format!(
            "[{}] {}\n",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            line
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                Error::run_log(format!("Failed to open run log {}: {}", self.path.display(), e))
            })?;

        file.write_all(entry.as_bytes()).await.map_err(|e| {
            Error::run_log(format!(
                "Failed to append to run log {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Path of the underlying log file
    pub fn path(&self) -> &Path {
        &self.path
    }
}
