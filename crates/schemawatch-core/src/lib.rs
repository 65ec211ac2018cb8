// # schemawatch-core
//
// Core library for the schemawatch change-detection system.
//
// ## Architecture Overview
//
// This library provides the versioning state machine for watching a remote
// API-schema document:
// - **SchemaFetcher**: Trait for retrieving the document with cache validators
// - **DiffTool**: Trait for producing a human-readable diff of two snapshots
// - **MetaStore**: Trait for persisting the run metadata record across invocations
// - **WatchEngine**: Core engine that classifies each fetch and archives changes
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from implementations
// 2. **Single Invocation**: One engine run is one bounded fetch-classify-archive cycle
// 3. **Append-Only Audit Trail**: Snapshots, diff reports, and the run log are
//    written once and never mutated
// 4. **Library-First**: All core functionality can be used as a library

pub mod traits;
pub mod engine;
pub mod archive;
pub mod runlog;
pub mod config;
pub mod error;
pub mod state;

// Re-export core types for convenience
pub use traits::{SchemaFetcher, DiffTool, MetaStore, MetadataRecord};
pub use engine::{WatchEngine, Verdict};
pub use runlog::RunOutcome;
pub use config::{WatchConfig, FetchConfig, DiffCommandConfig};
pub use error::{Error, Result};
pub use state::{MemoryMetaStore, FileMetaStore};
