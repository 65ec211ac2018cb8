//! Core watch engine
//!
//! The WatchEngine is responsible for:
//! - Loading the prior metadata record
//! - Performing one conditional fetch via SchemaFetcher
//! - Classifying the result against the prior content hash
//! - Archiving changes (snapshot, diff report) and rotating metadata
//! - Appending exactly one run log entry per invocation
//!
//! ## Flow
//!
//! ```text
//! ┌───────────┐   load    ┌──────────────┐   fetch    ┌───────────────┐
//! │ MetaStore │──────────▶│ WatchEngine  │───────────▶│ SchemaFetcher │
//! └───────────┘           └──────────────┘            └───────────────┘
//!                                │ classify
//!            ┌───────────────────┼─────────────────────┐
//!            ▼                   ▼                     ▼
//!      NOT_MODIFIED         UNCHANGED               SAVED
//!      (no writes)      (validators only)   (snapshot → diff → rotate)
//! ```
//!
//! ## Concurrency
//!
//! One run is strictly sequential and the design assumes one invocation at a
//! time; the scheduler that triggers runs is expected to serialize them. The
//! engine takes no lock around the metadata read-modify-write itself.

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::{debug, error, info, warn};

use crate::archive::{DiffReporter, SnapshotArchive, snapshot_name, SNAPSHOT_HASH_PREFIX_LEN};
use crate::config::WatchConfig;
use crate::error::Result;
use crate::runlog::{RunLog, RunOutcome};
use crate::traits::diff_tool::DiffOutput;
use crate::traits::fetcher::{CacheValidators, FetchResult};
use crate::traits::meta_store::MetadataRecord;
use crate::traits::{DiffTool, MetaStore, SchemaFetcher};

/// Classification of one fetch against the prior metadata
///
/// Transport failures never reach classification; they are the `Err` arm of
/// the fetch itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Server signalled 304; nothing to compare, metadata stays untouched
    ServerNotModified,

    /// Body hash equals the latest snapshot hash; only validators refresh
    ContentUnchanged {
        /// Validators from this response
        validators: CacheValidators,
    },

    /// Body hash differs from the latest snapshot hash, or no snapshot exists
    Changed {
        /// The fetched body
        body: String,
        /// Full sha256 hex of the body
        content_hash: String,
        /// Validators from this response
        validators: CacheValidators,
    },
}

/// Full sha256 hex digest over the exact body bytes
pub fn content_hash(body: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Classify a fetch result against the prior metadata record
///
/// Pure: same inputs always yield the same verdict. An absent
/// `latest_hash` (first run, or partially written state) always classifies a
/// returned body as `Changed` since there is nothing to compare against.
pub fn classify(fetch: FetchResult, prior: &MetadataRecord) -> Verdict {
    match fetch {
        FetchResult::NotModified => Verdict::ServerNotModified,
        FetchResult::Modified { body, validators } => {
            let hash = content_hash(&body);
            if prior.latest_hash.as_deref() == Some(hash.as_str()) {
                Verdict::ContentUnchanged { validators }
            } else {
                Verdict::Changed {
                    body,
                    content_hash: hash,
                    validators,
                }
            }
        }
    }
}

/// Core watch engine
///
/// Owns the collaborators for one watched document and drives one
/// fetch-classify-archive cycle per [`WatchEngine::run_once`] call.
pub struct WatchEngine {
    /// Transport for the watched document
    fetcher: Box<dyn SchemaFetcher>,

    /// Diff capability for change reports
    diff_tool: Box<dyn DiffTool>,

    /// Persistent metadata record
    meta_store: Box<dyn MetaStore>,

    /// Snapshot directory
    archive: SnapshotArchive,

    /// Diff report directory
    reporter: DiffReporter,

    /// Append-only run log
    run_log: RunLog,

    /// URL of the watched document
    source_url: String,
}

impl WatchEngine {
    /// Create a new watch engine
    ///
    /// # Parameters
    ///
    /// - `fetcher`: transport implementation
    /// - `diff_tool`: diff capability implementation
    /// - `meta_store`: metadata store implementation
    /// - `config`: watch configuration (validated here)
    pub fn new(
        fetcher: Box<dyn SchemaFetcher>,
        diff_tool: Box<dyn DiffTool>,
        meta_store: Box<dyn MetaStore>,
        config: WatchConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            fetcher,
            diff_tool,
            meta_store,
            archive: SnapshotArchive::new(&config.data_dir),
            reporter: DiffReporter::new(&config.diffs_dir),
            run_log: RunLog::new(&config.logs_dir),
            source_url: config.source_url,
        })
    }

    /// Run one watch cycle
    ///
    /// # Returns
    ///
    /// - `Ok(RunOutcome)`: terminal verdict of a successful run
    /// - `Err(Error)`: transport failure or a fatal write failure; an ERROR
    ///   line has already been appended to the run log
    pub async fn run_once(&self) -> Result<RunOutcome> {
        self.archive.ensure_dir().await?;
        self.reporter.ensure_dir().await?;
        self.run_log.ensure_dir().await?;
        self.archive.remove_legacy_pointers().await;

        let prior = self.meta_store.load().await?;
        let validators = prior.conditional_validators();
        debug!(
            url = %self.source_url,
            conditional = !validators.is_empty(),
            fetcher = self.fetcher.fetcher_name(),
            "Fetching schema"
        );

        let fetch = match self.fetcher.fetch(&self.source_url, &validators).await {
            Ok(result) => result,
            Err(e) => {
                error!("Fetch failed: {}", e);
                self.run_log
                    .append(&format!("ERROR Fetch failed: {}", e))
                    .await?;
                return Err(e);
            }
        };

        match classify(fetch, &prior) {
            Verdict::ServerNotModified => {
                info!("Server indicates no change, metadata untouched");
                self.run_log
                    .append("NOT_MODIFIED 304 (server indicates no change)")
                    .await?;
                Ok(RunOutcome::NotModified)
            }
            Verdict::ContentUnchanged { validators } => {
                let mut record = prior;
                record.refresh_validators(validators);
                self.meta_store.save(&record).await?;

                info!("Content hash matches latest snapshot, no new file saved");
                self.run_log
                    .append("UNCHANGED (hash match), no new file saved")
                    .await?;
                Ok(RunOutcome::Unchanged)
            }
            Verdict::Changed {
                body,
                content_hash,
                validators,
            } => self.archive_change(prior, body, content_hash, validators).await,
        }
    }

    /// Archive a detected change: snapshot, diff report, pointer rotation
    async fn archive_change(
        &self,
        prior: MetadataRecord,
        body: String,
        content_hash: String,
        validators: CacheValidators,
    ) -> Result<RunOutcome> {
        let name = snapshot_name(Utc::now().date_naive(), &content_hash);

        let new_path = match self.archive.write_snapshot(&name, &body).await {
            Ok(path) => path,
            Err(e) => {
                error!("Snapshot write failed: {}", e);
                self.run_log.append(&format!("ERROR {}", e)).await?;
                return Err(e);
            }
        };

        if let Some(prior_name) = prior.latest_file.as_deref() {
            let old_path = self.archive.snapshot_path(prior_name);
            let output = match self.diff_tool.diff(&old_path, &new_path).await {
                Ok(output) => output,
                Err(e) => {
                    warn!(tool = self.diff_tool.tool_name(), "Diff tool failed: {}", e);
                    DiffOutput::from_failure(e.to_string())
                }
            };
            if output.exit_failed {
                debug!(
                    tool = self.diff_tool.tool_name(),
                    "Diff tool exited non-zero, capturing output anyway"
                );
            }

            let report_path = self
                .reporter
                .write(Utc::now(), prior_name, &name, &output)
                .await?;
            info!("Diff report written to {}", report_path.display());
        } else {
            info!("First run: nothing to diff against");
        }

        let hash_prefix = content_hash[..SNAPSHOT_HASH_PREFIX_LEN].to_string();
        let mut record = prior;
        record.rotate(name.clone(), content_hash, validators);
        self.meta_store.save(&record).await?;

        info!("Saved {} (sha256 {})", name, hash_prefix);
        self.run_log
            .append(&format!("SAVED {} (sha256 {})", name, hash_prefix))
            .await?;

        Ok(RunOutcome::Saved {
            snapshot: name,
            hash_prefix,
        })
    }
}
