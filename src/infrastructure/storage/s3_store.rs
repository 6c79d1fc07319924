use std::sync::Arc;

use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path as StorePath;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};

use crate::application::ports::{ObjectStorage, StorageError};
use crate::domain::PersistedLocation;

pub(super) const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

#[derive(Debug, Clone)]
pub struct S3Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
    pub region: String,
    /// S3-compatible endpoint; switches to path-style addressing.
    pub endpoint: Option<String>,
}

/// S3 buckets addressed by name at call time. A client is built per bucket.
pub struct S3ObjectStorage {
    credentials: S3Credentials,
}

impl S3ObjectStorage {
    pub fn new(credentials: S3Credentials) -> Self {
        Self { credentials }
    }

    fn store_for(&self, bucket: &str) -> Result<Arc<dyn ObjectStore>, StorageError> {
        if bucket.is_empty() {
            return Err(StorageError::InvalidInput("bucket name is empty".to_string()));
        }

        let mut builder = AmazonS3Builder::new()
            .with_bucket_name(bucket)
            .with_region(&self.credentials.region)
            .with_access_key_id(&self.credentials.access_key_id)
            .with_secret_access_key(&self.credentials.secret_access_key);

        if let Some(token) = &self.credentials.session_token {
            builder = builder.with_token(token);
        }
        if let Some(endpoint) = &self.credentials.endpoint {
            builder = builder
                .with_endpoint(endpoint)
                .with_allow_http(true)
                .with_virtual_hosted_style_request(false);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::UploadFailed(format!("invalid S3 configuration: {e}")))?;
        Ok(Arc::new(store))
    }
}

pub(super) fn text_put_options() -> PutOptions {
    let mut attributes = Attributes::new();
    attributes.insert(Attribute::ContentType, TEXT_CONTENT_TYPE.into());
    PutOptions {
        attributes,
        ..Default::default()
    }
}

pub(super) fn map_get_error(location: String, error: object_store::Error) -> StorageError {
    match error {
        object_store::Error::NotFound { .. } => StorageError::NotFound(location),
        other => StorageError::DownloadFailed(format!("{location}: {other}")),
    }
}

#[async_trait::async_trait]
impl ObjectStorage for S3ObjectStorage {
    #[tracing::instrument(skip(self))]
    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes, StorageError> {
        let store = self.store_for(bucket)?;
        let location = format!("s3://{bucket}/{key}");

        let result = store
            .get(&StorePath::from(key))
            .await
            .map_err(|e| map_get_error(location.clone(), e))?;

        result
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(format!("{location}: {e}")))
    }

    #[tracing::instrument(skip(self, data), fields(size = data.len()))]
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
    ) -> Result<PersistedLocation, StorageError> {
        let store = self.store_for(bucket)?;

        store
            .put_opts(&StorePath::from(key), PutPayload::from(data), text_put_options())
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        Ok(PersistedLocation::new(format!("s3://{bucket}/{key}")))
    }
}
