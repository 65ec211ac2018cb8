// # Archive
//
// Append-only artifact storage for detected changes.
//
// - `snapshot`: dated, content-addressed copies of the watched document
// - `report`: human-readable diff reports, one per change with a predecessor
//
// Artifacts are written once and never mutated or deleted by normal
// operation.

pub mod snapshot;
pub mod report;

pub use snapshot::{SnapshotArchive, snapshot_name, SNAPSHOT_HASH_PREFIX_LEN};
pub use report::DiffReporter;
