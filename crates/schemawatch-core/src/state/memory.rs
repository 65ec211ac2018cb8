// # Memory Meta Store
//
// In-memory implementation of MetaStore.
//
// ## Purpose
//
// Holds the metadata record without touching the filesystem. Nothing
// survives the process, so every new process is a first run.
//
// ## When to Use
//
// - Tests
// - Dry runs where archiving is pointed at scratch space

use std::sync::Arc;
use tokio::sync::RwLock;
use async_trait::async_trait;

use crate::Error;
use crate::traits::meta_store::{MetaStore, MetadataRecord};

/// In-memory metadata store
#[derive(Debug, Clone, Default)]
pub struct MemoryMetaStore {
    inner: Arc<RwLock<MetadataRecord>>,
}

impl MemoryMetaStore {
    /// Create a store holding the all-absent first-run record
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with a record
    pub fn with_record(record: MetadataRecord) -> Self {
        Self {
            inner: Arc::new(RwLock::new(record)),
        }
    }

    /// Read the current record without going through the trait
    pub async fn snapshot(&self) -> MetadataRecord {
        self.inner.read().await.clone()
    }
}

#[async_trait]
impl MetaStore for MemoryMetaStore {
    async fn load(&self) -> Result<MetadataRecord, Error> {
        Ok(self.inner.read().await.clone())
    }

    async fn save(&self, record: &MetadataRecord) -> Result<(), Error> {
        *self.inner.write().await = record.clone();
        Ok(())
    }
}
