// src/storage/object_store.rs
//! In-memory document storage.
//!
//! Stands in for a bucket-based object store: uploads never overwrite and
//! every object gets a deterministic public URL under a configured base.

use std::collections::HashMap;
use std::future::{ready, Future};
use std::sync::{Arc, Mutex, MutexGuard};

use log::debug;

use crate::error::StoreError;
use crate::storage::ObjectStore;

/// A stored object and its declared content type.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

#[derive(Clone)]
pub struct MemoryObjectStore {
    public_base_url: String,
    objects: Arc<Mutex<HashMap<(String, String), StoredObject>>>,
}

impl MemoryObjectStore {
    /// # Arguments
    /// * `public_base_url` - Prefix of public URLs, e.g. `https://host/storage/v1/object/public`
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            public_base_url: public_base_url.into(),
            objects: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<(String, String), StoredObject>> {
        self.objects.lock().unwrap_or_else(|poison| poison.into_inner())
    }

    pub fn object(&self, bucket: &str, name: &str) -> Option<StoredObject> {
        self.lock()
            .get(&(bucket.to_string(), name.to_string()))
            .cloned()
    }

    pub fn object_count(&self) -> usize {
        self.lock().len()
    }
}

impl ObjectStore for MemoryObjectStore {
    fn upload(
        &self,
        bucket: &str,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        let key = (bucket.to_string(), name.to_string());
        let mut objects = self.lock();
        let result = if objects.contains_key(&key) {
            Err(StoreError::Duplicate(format!("{}/{}", bucket, name)))
        } else {
            debug!("Stored object {}/{} ({} bytes)", bucket, name, bytes.len());
            objects.insert(
                key,
                StoredObject {
                    bytes,
                    content_type: content_type.to_string(),
                },
            );
            Ok(())
        };
        ready(result)
    }

    fn public_url(&self, bucket: &str, name: &str) -> String {
        format!(
            "{}/{}/{}",
            self.public_base_url.trim_end_matches('/'),
            bucket,
            name
        )
    }
}
