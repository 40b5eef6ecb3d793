//! Document storage seam.
//!
//! The activities hand each batch of documents to a [`DocumentStore`] and
//! return whatever [`DataRef`] it gives back. The handle is opaque here.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::document::Document;
use crate::error::StoreError;

/// Opaque handle identifying a persisted batch of documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataRef(String);

impl DataRef {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DataRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persists a batch of documents and returns a handle to it.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store `documents` as one batch.
    async fn store(&self, documents: &[Document]) -> Result<DataRef, StoreError>;
}

/// In-process store that keeps every batch in memory.
#[derive(Default)]
pub struct MemoryStore {
    batches: Mutex<Vec<(DataRef, Vec<Document>)>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Documents stored under `data_ref`, if any.
    pub async fn get(&self, data_ref: &DataRef) -> Option<Vec<Document>> {
        self.batches
            .lock()
            .await
            .iter()
            .find(|(r, _)| r == data_ref)
            .map(|(_, docs)| docs.clone())
    }

    /// Number of batches stored so far.
    pub async fn batch_count(&self) -> usize {
        self.batches.lock().await.len()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn store(&self, documents: &[Document]) -> Result<DataRef, StoreError> {
        let data_ref = DataRef::new(format!("memory://{}", Uuid::new_v4()));
        self.batches
            .lock()
            .await
            .push((data_ref.clone(), documents.to_vec()));
        debug!(data_ref = %data_ref, count = documents.len(), "Stored documents in memory");
        Ok(data_ref)
    }
}

/// Store that writes each batch as a pretty-printed JSON array file.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn store(&self, documents: &[Document]) -> Result<DataRef, StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.dir.join(format!("{}.json", Uuid::new_v4()));
        let content = serde_json::to_vec_pretty(documents)?;
        tokio::fs::write(&path, content).await?;

        debug!(path = %path.display(), count = documents.len(), "Wrote document batch");
        Ok(DataRef::new(path.display().to_string()))
    }
}
