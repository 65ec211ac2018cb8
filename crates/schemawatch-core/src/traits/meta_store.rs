// # Meta Store Trait
//
// Defines the interface for persisting the run metadata record.
//
// ## Purpose
//
// The metadata record is the only state carried between invocations. It
// remembers:
// - The cache validators from the most recent successful fetch
// - The name and full content hash of the latest archived snapshot
// - The snapshot that "latest" displaced on the last change
//
// This is what makes re-runs idempotent and lets a run decide whether the
// fetched content is actually new.
//
// ## Implementations
//
// - File-based: JSON file, atomic overwrite (`state::file`)
// - In-memory: tests and ephemeral runs (`state::memory`)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::fetcher::CacheValidators;

/// Persisted metadata for one watched document
///
/// All fields are optional; the all-absent record is the first-run state.
/// Absent fields serialize as `null` so the on-disk shape is stable.
///
/// # Invariant
///
/// `previous_file`/`previous_hash` always describe the snapshot that was
/// latest immediately before the current `latest_file` was written. They
/// rotate together with `latest_*`, only on a detected change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Entity tag from the most recent successful fetch
    #[serde(default)]
    pub etag: Option<String>,

    /// Last-modification timestamp from the most recent successful fetch
    #[serde(default)]
    pub last_modified: Option<String>,

    /// File name of the most recently archived snapshot
    #[serde(default)]
    pub latest_file: Option<String>,

    /// Full content hash of the most recently archived snapshot
    #[serde(default)]
    pub latest_hash: Option<String>,

    /// File name of the snapshot displaced by `latest_file`
    #[serde(default)]
    pub previous_file: Option<String>,

    /// Full content hash of the snapshot displaced by `latest_file`
    #[serde(default)]
    pub previous_hash: Option<String>,
}

impl MetadataRecord {
    /// Validators to attach to the next fetch
    ///
    /// Validators are only meaningful alongside an archived snapshot: without
    /// `latest_hash` there is nothing to short-circuit against, so a record
    /// that carries validators but no hash (a partially written state file)
    /// degrades to an unconditional fetch.
    pub fn conditional_validators(&self) -> CacheValidators {
        if self.latest_hash.is_none() {
            return CacheValidators::default();
        }

        CacheValidators {
            etag: self.etag.clone(),
            last_modified: self.last_modified.clone(),
        }
    }

    /// Replace only the cache validators (unchanged-content outcome)
    pub fn refresh_validators(&mut self, validators: CacheValidators) {
        self.etag = validators.etag;
        self.last_modified = validators.last_modified;
    }

    /// Rotate the pointers for a newly archived snapshot (changed outcome)
    ///
    /// The pre-rotation `latest_*` values become `previous_*`.
    pub fn rotate(
        &mut self,
        snapshot_name: String,
        content_hash: String,
        validators: CacheValidators,
    ) {
        self.previous_file = self.latest_file.take();
        self.previous_hash = self.latest_hash.take();
        self.latest_file = Some(snapshot_name);
        self.latest_hash = Some(content_hash);
        self.refresh_validators(validators);
    }
}

/// Trait for metadata store implementations
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks. They
/// are not expected to arbitrate concurrent invocations: the operating
/// environment serializes runs, and a store only sees one writer at a time.
#[async_trait]
pub trait MetaStore: Send + Sync {
    /// Load the persisted record
    ///
    /// A missing or unreadable record is the first-run state, not an error:
    /// implementations return the all-absent default in that case.
    ///
    /// # Returns
    ///
    /// - `Ok(MetadataRecord)`: the stored record, or the default
    /// - `Err(Error)`: storage error
    async fn load(&self) -> Result<MetadataRecord, crate::Error>;

    /// Overwrite the persisted record in full
    ///
    /// This is a whole-record replacement, never a partial patch.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: successfully persisted
    /// - `Err(Error)`: storage error
    async fn save(&self, record: &MetadataRecord) -> Result<(), crate::Error>;
}
