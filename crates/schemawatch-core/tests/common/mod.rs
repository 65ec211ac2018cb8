//! Test doubles and common utilities for engine contract tests
//!
//! The doubles count their calls and record their inputs so tests can assert
//! on collaborator interactions without real network or diff tooling.

use schemawatch_core::config::WatchConfig;
use schemawatch_core::error::Result;
use schemawatch_core::runlog::RUN_LOG_FILE;
use schemawatch_core::state::file::META_FILE_NAME;
use schemawatch_core::traits::diff_tool::{DiffOutput, DiffTool};
use schemawatch_core::traits::fetcher::{CacheValidators, FetchResult, SchemaFetcher};
use schemawatch_core::Error;

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One planned response for the scripted fetcher
#[derive(Debug, Clone)]
pub enum PlannedFetch {
    /// Respond with a 304 short-circuit
    NotModified,
    /// Respond with a body and optional validators
    Modified {
        body: String,
        etag: Option<String>,
        last_modified: Option<String>,
    },
    /// Fail the fetch (network error or bad status)
    Fail(String),
}

impl PlannedFetch {
    /// Convenience for a body-only response
    pub fn body(body: &str) -> Self {
        Self::Modified {
            body: body.to_string(),
            etag: None,
            last_modified: None,
        }
    }

    /// Convenience for a body with an entity tag
    pub fn body_with_etag(body: &str, etag: &str) -> Self {
        Self::Modified {
            body: body.to_string(),
            etag: Some(etag.to_string()),
            last_modified: None,
        }
    }
}

/// A fetcher that replays a scripted sequence of responses
pub struct ScriptedFetcher {
    plan: Arc<std::sync::Mutex<VecDeque<PlannedFetch>>>,
    fetch_call_count: Arc<AtomicUsize>,
    seen_validators: Arc<std::sync::Mutex<Vec<CacheValidators>>>,
}

impl ScriptedFetcher {
    pub fn new(plan: Vec<PlannedFetch>) -> Self {
        Self {
            plan: Arc::new(std::sync::Mutex::new(plan.into())),
            fetch_call_count: Arc::new(AtomicUsize::new(0)),
            seen_validators: Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    /// Create a twin that shares counters with an existing fetcher
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            plan: Arc::clone(&other.plan),
            fetch_call_count: Arc::clone(&other.fetch_call_count),
            seen_validators: Arc::clone(&other.seen_validators),
        }
    }

    /// Get the number of times fetch() was called
    pub fn fetch_call_count(&self) -> usize {
        self.fetch_call_count.load(Ordering::SeqCst)
    }

    /// Get the validators each fetch() call carried
    pub fn seen_validators(&self) -> Vec<CacheValidators> {
        self.seen_validators.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SchemaFetcher for ScriptedFetcher {
    async fn fetch(&self, _url: &str, validators: &CacheValidators) -> Result<FetchResult> {
        self.fetch_call_count.fetch_add(1, Ordering::SeqCst);
        self.seen_validators.lock().unwrap().push(validators.clone());

        let planned = self
            .plan
            .lock()
            .unwrap()
            .pop_front()
            .expect("fetch plan exhausted");

        match planned {
            PlannedFetch::NotModified => Ok(FetchResult::NotModified),
            PlannedFetch::Modified {
                body,
                etag,
                last_modified,
            } => Ok(FetchResult::Modified {
                body,
                validators: CacheValidators {
                    etag,
                    last_modified,
                },
            }),
            PlannedFetch::Fail(message) => Err(Error::http(message)),
        }
    }

    fn fetcher_name(&self) -> &'static str {
        "scripted"
    }
}

/// A diff tool that records its invocations
pub struct RecordingDiffTool {
    diff_call_count: Arc<AtomicUsize>,
    seen_paths: Arc<std::sync::Mutex<Vec<(PathBuf, PathBuf)>>>,
    output: DiffOutput,
    fail_message: Option<String>,
}

impl RecordingDiffTool {
    pub fn new() -> Self {
        Self::with_output(DiffOutput {
            stdout: "@@ recorded diff @@".to_string(),
            stderr: String::new(),
            exit_failed: false,
        })
    }

    /// Return the given output from every diff() call
    pub fn with_output(output: DiffOutput) -> Self {
        Self {
            diff_call_count: Arc::new(AtomicUsize::new(0)),
            seen_paths: Arc::new(std::sync::Mutex::new(Vec::new())),
            output,
            fail_message: None,
        }
    }

    /// Fail every diff() call (tool could not be invoked)
    pub fn failing(message: &str) -> Self {
        Self {
            fail_message: Some(message.to_string()),
            ..Self::new()
        }
    }

    /// Create a twin that shares counters with an existing tool
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            diff_call_count: Arc::clone(&other.diff_call_count),
            seen_paths: Arc::clone(&other.seen_paths),
            output: other.output.clone(),
            fail_message: other.fail_message.clone(),
        }
    }

    /// Get the number of times diff() was called
    pub fn diff_call_count(&self) -> usize {
        self.diff_call_count.load(Ordering::SeqCst)
    }

    /// Get the (old, new) path pairs diff() was called with
    pub fn seen_paths(&self) -> Vec<(PathBuf, PathBuf)> {
        self.seen_paths.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DiffTool for RecordingDiffTool {
    async fn diff(&self, old_path: &Path, new_path: &Path) -> Result<DiffOutput> {
        self.diff_call_count.fetch_add(1, Ordering::SeqCst);
        self.seen_paths
            .lock()
            .unwrap()
            .push((old_path.to_path_buf(), new_path.to_path_buf()));

        match &self.fail_message {
            Some(message) => Err(Error::diff_tool(message.clone())),
            None => Ok(self.output.clone()),
        }
    }

    fn tool_name(&self) -> &'static str {
        "recording"
    }
}

/// Watch configuration rooted at a test directory
pub fn watch_config(root: &Path) -> WatchConfig {
    WatchConfig::new("https://example.com/openapi.json").rooted_at(root)
}

/// Path of the metadata record under a test root
pub fn meta_path(root: &Path) -> PathBuf {
    root.join("data").join(META_FILE_NAME)
}

/// Read the run log under a test root
pub async fn read_run_log(root: &Path) -> String {
    tokio::fs::read_to_string(root.join("logs").join(RUN_LOG_FILE))
        .await
        .unwrap_or_default()
}

/// Sorted snapshot file names under a test root (metadata record excluded)
pub fn snapshot_files(root: &Path) -> Vec<String> {
    list_files(&root.join("data"))
        .into_iter()
        .filter(|name| name != META_FILE_NAME && !name.ends_with(".tmp"))
        .collect()
}

/// Sorted diff report file names under a test root
pub fn report_files(root: &Path) -> Vec<String> {
    list_files(&root.join("diffs"))
}

fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}
