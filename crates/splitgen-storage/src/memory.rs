//! In-memory blob store.
//!
//! Behaves like a bucket for one process. Uploads and reads can be made to
//! fail by key prefix to exercise the pipeline's degraded paths.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use crate::addressing::{BucketAddress, DEFAULT_PUBLIC_HOST};
use crate::error::{StorageError, StorageResult};
use crate::store::BlobStore;

#[derive(Debug, Clone)]
struct StoredObject {
    data: Vec<u8>,
    content_type: String,
}

#[derive(Debug, Default)]
struct State {
    objects: BTreeMap<String, StoredObject>,
    failing_uploads: Vec<String>,
    failing_reads: Vec<String>,
    upload_attempts: HashMap<String, u32>,
}

/// Map-backed [`BlobStore`].
#[derive(Debug)]
pub struct InMemoryStore {
    address: BucketAddress,
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            address: BucketAddress::new(bucket, DEFAULT_PUBLIC_HOST),
            state: Mutex::new(State::default()),
        }
    }

    /// Make uploads of keys starting with `prefix` fail.
    pub fn fail_uploads_under(&self, prefix: impl Into<String>) {
        self.state().failing_uploads.push(prefix.into());
    }

    /// Make reads of keys starting with `prefix` fail.
    pub fn fail_reads_under(&self, prefix: impl Into<String>) {
        self.state().failing_reads.push(prefix.into());
    }

    /// Store an object directly.
    pub fn insert(&self, key: impl Into<String>, data: Vec<u8>, content_type: impl Into<String>) {
        self.state().objects.insert(
            key.into(),
            StoredObject {
                data,
                content_type: content_type.into(),
            },
        );
    }

    /// Stored keys in lexical order.
    pub fn keys(&self) -> Vec<String> {
        self.state().objects.keys().cloned().collect()
    }

    /// Stored keys starting with `prefix`.
    pub fn keys_under(&self, prefix: &str) -> Vec<String> {
        self.state()
            .objects
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect()
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.state().objects.get(key).map(|o| o.data.clone())
    }

    pub fn content_type(&self, key: &str) -> Option<String> {
        self.state().objects.get(key).map(|o| o.content_type.clone())
    }

    /// Total upload attempts, successful or not, for keys starting with `prefix`.
    pub fn upload_attempts_under(&self, prefix: &str) -> u32 {
        self.state()
            .upload_attempts
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(_, n)| *n)
            .sum()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl BlobStore for InMemoryStore {
    fn bucket(&self) -> &str {
        self.address.bucket()
    }

    fn object_url(&self, key: &str) -> String {
        self.address.object_url(key)
    }

    async fn upload_bytes(
        &self,
        data: Vec<u8>,
        key: &str,
        content_type: &str,
    ) -> StorageResult<String> {
        let mut state = self.state();
        *state.upload_attempts.entry(key.to_string()).or_default() += 1;

        if state.failing_uploads.iter().any(|p| key.starts_with(p.as_str())) {
            return Err(StorageError::upload_failed(format!("injected failure for {}", key)));
        }

        state.objects.insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(self.address.object_url(key))
    }

    async fn get_object(&self, key: &str) -> StorageResult<Vec<u8>> {
        let state = self.state();

        if state.failing_reads.iter().any(|p| key.starts_with(p.as_str())) {
            return Err(StorageError::download_failed(format!("injected failure for {}", key)));
        }

        state
            .objects
            .get(key)
            .map(|o| o.data.clone())
            .ok_or_else(|| StorageError::not_found(key))
    }
}
