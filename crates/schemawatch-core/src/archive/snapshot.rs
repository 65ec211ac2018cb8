// # Snapshot Archive
//
// Dated, content-addressed snapshot files.
//
// ## Naming
//
// `{YYYY-MM-DD}-{first 12 hex chars of the sha256}.json`. The name is a
// deterministic function of capture date and body bytes, so re-archiving
// identical content on the same day collapses to the same file. The full
// hash lives in the metadata record; the prefix is for the filename only.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::Error;

/// Hex characters of the content hash used in snapshot file names
pub const SNAPSHOT_HASH_PREFIX_LEN: usize = 12;

/// Legacy stable-pointer files maintained by earlier deployments
const LEGACY_POINTER_FILES: [&str; 2] = ["latest.json", "previous.json"];

/// Compute the snapshot file name for a capture date and content hash
pub fn snapshot_name(date: NaiveDate, content_hash: &str) -> String {
    let prefix_len = content_hash.len().min(SNAPSHOT_HASH_PREFIX_LEN);
    format!(
        "{}-{}.json",
        date.format("%Y-%m-%d"),
        &content_hash[..prefix_len]
    )
}

/// Snapshot directory handle
#[derive(Debug, Clone)]
pub struct SnapshotArchive {
    data_dir: PathBuf,
}

impl SnapshotArchive {
    /// Create a handle for a snapshot directory
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Create the snapshot directory if it does not exist
    pub async fn ensure_dir(&self) -> Result<(), Error> {
        fs::create_dir_all(&self.data_dir).await.map_err(|e| {
            Error::archive(format!(
                "Failed to create data directory {}: {}",
                self.data_dir.display(),
                e
            ))
        })
    }

    /// Full path of a snapshot by file name
    pub fn snapshot_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    /// Write snapshot bytes under the given name
    ///
    /// A failed write is fatal for the run: the caller must not report the
    /// change as saved or rotate metadata pointers.
    pub async fn write_snapshot(&self, name: &str, body: &str) -> Result<PathBuf, Error> {
        let path = self.snapshot_path(name);
        fs::write(&path, body).await.map_err(|e| {
            Error::archive(format!("Failed to write snapshot {}: {}", path.display(), e))
        })?;

        tracing::debug!("Snapshot written to {}", path.display());
        Ok(path)
    }

    /// Remove deprecated `latest.json`/`previous.json` pointer copies
    ///
    /// One-time migration concern, best-effort: failures are logged and
    /// otherwise ignored.
    pub async fn remove_legacy_pointers(&self) {
        for name in LEGACY_POINTER_FILES {
            let path = self.data_dir.join(name);
            match fs::remove_file(&path).await {
                Ok(()) => {
                    tracing::info!("Removed legacy pointer file {}", path.display());
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::debug!("Could not remove legacy pointer {}: {}", path.display(), e);
                }
            }
        }
    }

    /// Directory this archive writes into
    pub fn dir(&self) -> &Path {
        &self.data_dir
    }
}
