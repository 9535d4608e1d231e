//! Object storage seam.
//!
//! Everything that needs to push file bytes somewhere goes through
//! [`ObjectStorage`], so handlers and the upload wizard never depend on a
//! concrete backend.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use uuid::Uuid;

use crate::utils::get_extension;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Where an uploaded object ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `data` and return its key and public URL.
    async fn upload(
        &self,
        file_name: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<StoredObject>;
}

/// Builds the object key for a new upload: `uploads/{uuid}.{ext}`.
pub fn object_key(file_name: &str) -> String {
    format!("uploads/{}.{}", Uuid::new_v4(), get_extension(file_name))
}

/// In-process store. Objects are kept in memory and get `memory://` URLs.
///
/// File names registered with [`MemoryStorage::fail_on`] are rejected, which
/// makes partial batch failures reproducible.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Default)]
struct MemoryInner {
    objects: Vec<(String, Bytes)>,
    failing: HashSet<String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, file_name: impl Into<String>) {
        self.lock().failing.insert(file_name.into());
    }

    pub fn recover(&self, file_name: &str) {
        self.lock().failing.remove(file_name);
    }

    pub fn object_count(&self) -> usize {
        self.lock().objects.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        // A poisoned lock only means a test thread panicked mid-insert.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn upload(
        &self,
        file_name: &str,
        _content_type: &str,
        data: Bytes,
    ) -> StorageResult<StoredObject> {
        let mut inner = self.lock();
        if inner.failing.contains(file_name) {
            return Err(StorageError::UploadFailed(format!(
                "{file_name} rejected by store"
            )));
        }

        let key = object_key(file_name);
        inner.objects.push((key.clone(), data));
        Ok(StoredObject {
            url: format!("memory://{key}"),
            key,
        })
    }
}
