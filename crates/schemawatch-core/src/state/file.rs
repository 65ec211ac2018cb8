// # File Meta Store
//
// File-based implementation of MetaStore.
//
// ## Purpose
//
// Persists the metadata record across scheduled invocations as a single JSON
// object, one file per watched document.
//
// ## First-Run Recovery
//
// A missing or unparseable file is the first-run state: `load` returns the
// all-absent default and never fails the run for it. The cost of being wrong
// is one redundant snapshot, which the content-addressed naming collapses.
//
// ## Atomicity
//
// `save` rewrites the whole record via a temporary file and rename, so a
// crash mid-write leaves either the old record or the new one, never a
// truncated mix.
//
// ## File Format
//
// ```json
// {
//   "etag": "\"abc123\"",
//   "last_modified": "Mon, 01 Jan 2024 00:00:00 GMT",
//   "latest_file": "2024-01-01-d4735e3a265e.json",
//   "latest_hash": "d4735e3a265e...",
//   "previous_file": null,
//   "previous_hash": null
// }
// ```

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::Error;
use crate::traits::meta_store::{MetaStore, MetadataRecord};

/// Default file name for the metadata record inside the data directory
pub const META_FILE_NAME: &str = "meta.json";

/// File-based metadata store
///
/// # Example
///
/// ```rust,no_run
/// use schemawatch_core::state::FileMetaStore;
/// use schemawatch_core::traits::meta_store::MetaStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileMetaStore::new("/var/lib/schemawatch/data/meta.json").await?;
///
///     let mut record = store.load().await?;
///     record.latest_hash = Some("d4735e3a265e".to_string());
///     store.save(&record).await?;
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct FileMetaStore {
    path: PathBuf,
}

impl FileMetaStore {
    /// Create a file meta store, creating parent directories if needed
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    Error::meta_store(format!(
                        "Failed to create metadata directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        Ok(Self { path })
    }

    /// Get path to temporary file for atomic writes
    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }
}

#[async_trait]
impl MetaStore for FileMetaStore {
    async fn load(&self) -> Result<MetadataRecord, Error> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    "No metadata record at {}, starting from an empty record",
                    self.path.display()
                );
                return Ok(MetadataRecord::default());
            }
            Err(e) => {
                tracing::warn!(
                    "Could not read metadata record {}: {}. Starting from an empty record.",
                    self.path.display(),
                    e
                );
                return Ok(MetadataRecord::default());
            }
        };

        match serde_json::from_str(&content) {
            Ok(record) => Ok(record),
            Err(e) => {
                tracing::warn!(
                    "Metadata record {} is not valid JSON: {}. Starting from an empty record.",
                    self.path.display(),
                    e
                );
                Ok(MetadataRecord::default())
            }
        }
    }

    async fn save(&self, record: &MetadataRecord) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(record)
            .map_err(|e| Error::meta_store(format!("Failed to serialize metadata: {}", e)))?;

        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::meta_store(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(json.as_bytes()).await.map_err(|e| {
                Error::meta_store(format!(
                    "Failed to write to temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.flush().await.map_err(|e| {
                Error::meta_store(format!(
                    "Failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        // Atomic rename (temp -> actual)
        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::meta_store(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::trace!("Metadata written to {}", self.path.display());
        Ok(())
    }
}
