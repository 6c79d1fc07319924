use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use bytes::Bytes;

use crate::application::ports::{ObjectStorage, StorageError};
use crate::domain::PersistedLocation;

/// Process-local object storage, keyed by bucket and key.
#[derive(Default)]
pub struct InMemoryObjectStorage {
    objects: RwLock<HashMap<(String, String), Bytes>>,
}

impl InMemoryObjectStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes, StorageError> {
        self.objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("memory://{bucket}/{key}")))
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
    ) -> Result<PersistedLocation, StorageError> {
        self.objects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((bucket.to_string(), key.to_string()), data);
        Ok(PersistedLocation::new(format!("memory://{bucket}/{key}")))
    }
}
