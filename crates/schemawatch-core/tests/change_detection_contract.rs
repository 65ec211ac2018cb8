//! Contract test: change detection across runs
//!
//! Verifies the unchanged-by-hash and changed paths:
//! - Byte-identical bodies refresh validators only, no new artifacts
//! - A differing body archives a snapshot, produces a diff report, and
//!   rotates the latest/previous pointers together
//! - A failing diff tool never blocks archiving

mod common;

use common::*;
use schemawatch_core::engine::content_hash;
use schemawatch_core::traits::MetaStore;
use schemawatch_core::{FileMetaStore, RunOutcome, WatchEngine};
use tempfile::tempdir;

#[tokio::test]
async fn identical_body_refreshes_validators_only() {
    let dir = tempdir().unwrap();
    let body = r#"{"a":1}"#;

    let fetcher = ScriptedFetcher::new(vec![
        PlannedFetch::body_with_etag(body, "\"v1\""),
        PlannedFetch::body_with_etag(body, "\"v2\""),
    ]);
    let fetch_probe = ScriptedFetcher::sharing_counters_with(&fetcher);
    let diff_tool = RecordingDiffTool::new();
    let diff_probe = RecordingDiffTool::sharing_counters_with(&diff_tool);

    let store = FileMetaStore::new(meta_path(dir.path())).await.unwrap();
    let engine = WatchEngine::new(
        Box::new(fetcher),
        Box::new(diff_tool),
        Box::new(store),
        watch_config(dir.path()),
    )
    .unwrap();

    let first = engine.run_once().await.unwrap();
    assert!(matches!(first, RunOutcome::Saved { .. }));

    let second = engine.run_once().await.unwrap();
    assert_eq!(second, RunOutcome::Unchanged);

    // The second fetch was conditional on the first run's validators
    assert_eq!(fetch_probe.seen_validators()[1].etag.as_deref(), Some("\"v1\""));

    // No new snapshot, no diff, no report
    assert_eq!(snapshot_files(dir.path()).len(), 1);
    assert_eq!(diff_probe.diff_call_count(), 0);
    assert!(report_files(dir.path()).is_empty());

    // Validators were refreshed; pointers were not
    let reloaded = FileMetaStore::new(meta_path(dir.path())).await.unwrap();
    let record = reloaded.load().await.unwrap();
    assert_eq!(record.etag.as_deref(), Some("\"v2\""));
    assert_eq!(record.latest_hash, Some(content_hash(body)));
    assert_eq!(record.previous_file, None);

    let log = read_run_log(dir.path()).await;
    assert!(log.contains("SAVED"));
    assert!(log.contains("UNCHANGED"));
}

#[tokio::test]
async fn changed_body_writes_report_and_rotates_pointers() {
    let dir = tempdir().unwrap();
    let old_body = r#"{"a":1}"#;
    let new_body = r#"{"a":2}"#;

    let fetcher = ScriptedFetcher::new(vec![
        PlannedFetch::body(old_body),
        PlannedFetch::body(new_body),
    ]);
    let diff_tool = RecordingDiffTool::new();
    let diff_probe = RecordingDiffTool::sharing_counters_with(&diff_tool);

    let store = FileMetaStore::new(meta_path(dir.path())).await.unwrap();
    let engine = WatchEngine::new(
        Box::new(fetcher),
        Box::new(diff_tool),
        Box::new(store),
        watch_config(dir.path()),
    )
    .unwrap();

    let first = engine.run_once().await.unwrap();
    let RunOutcome::Saved { snapshot: old_snapshot, .. } = first else {
        panic!("expected Saved on first run");
    };

    let second = engine.run_once().await.unwrap();
    let RunOutcome::Saved { snapshot: new_snapshot, .. } = second else {
        panic!("expected Saved on changed body");
    };
    assert_ne!(old_snapshot, new_snapshot);

    // The diff tool saw the two snapshot paths, old first
    assert_eq!(diff_probe.diff_call_count(), 1);
    let (old_path, new_path) = diff_probe.seen_paths()[0].clone();
    assert_eq!(old_path, dir.path().join("data").join(&old_snapshot));
    assert_eq!(new_path, dir.path().join("data").join(&new_snapshot));

    // One report naming both snapshots
    let reports = report_files(dir.path());
    assert_eq!(reports.len(), 1);
    let report = tokio::fs::read_to_string(dir.path().join("diffs").join(&reports[0]))
        .await
        .unwrap();
    assert!(report.contains(&format!("Old: {}", old_snapshot)));
    assert!(report.contains(&format!("New: {}", new_snapshot)));
    assert!(report.contains("@@ recorded diff @@"));

    // latest/previous rotated together
    let reloaded = FileMetaStore::new(meta_path(dir.path())).await.unwrap();
    let record = reloaded.load().await.unwrap();
    assert_eq!(record.latest_file.as_deref(), Some(new_snapshot.as_str()));
    assert_eq!(record.latest_hash, Some(content_hash(new_body)));
    assert_eq!(record.previous_file.as_deref(), Some(old_snapshot.as_str()));
    assert_eq!(record.previous_hash, Some(content_hash(old_body)));

    // Both snapshots remain on disk
    let mut expected = vec![old_snapshot, new_snapshot];
    expected.sort();
    assert_eq!(snapshot_files(dir.path()), expected);
}

#[tokio::test]
async fn diff_tool_failure_never_blocks_archiving() {
    let dir = tempdir().unwrap();

    let fetcher = ScriptedFetcher::new(vec![
        PlannedFetch::body(r#"{"a":1}"#),
        PlannedFetch::body(r#"{"a":2}"#),
    ]);
    let diff_tool = RecordingDiffTool::failing("diff tool missing");

    let store = FileMetaStore::new(meta_path(dir.path())).await.unwrap();
    let engine = WatchEngine::new(
        Box::new(fetcher),
        Box::new(diff_tool),
        Box::new(store),
        watch_config(dir.path()),
    )
    .unwrap();

    engine.run_once().await.unwrap();
    let second = engine.run_once().await.unwrap();

    // The run still concludes as a save
    assert!(matches!(second, RunOutcome::Saved { .. }));
    assert_eq!(snapshot_files(dir.path()).len(), 2);

    // The failure is captured in the report's stderr block
    let reports = report_files(dir.path());
    assert_eq!(reports.len(), 1);
    let report = tokio::fs::read_to_string(dir.path().join("diffs").join(&reports[0]))
        .await
        .unwrap();
    assert!(report.contains("[stderr]"));
    assert!(report.contains("diff tool missing"));

    // Metadata rotated despite the diff failure
    let reloaded = FileMetaStore::new(meta_path(dir.path())).await.unwrap();
    let record = reloaded.load().await.unwrap();
    assert!(record.previous_file.is_some());

    let log = read_run_log(dir.path()).await;
    assert_eq!(log.matches("SAVED").count(), 2);
}
