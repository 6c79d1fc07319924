use std::sync::Arc;

use crate::application::ports::{ObjectStorage, StorageError};
use crate::presentation::config::{AwsSettings, AzureSettings};

use super::azure_store::AzureBlobStorage;
use super::s3_store::{S3Credentials, S3ObjectStorage};

pub struct ObjectStorageFactory;

impl ObjectStorageFactory {
    /// S3 storage, or `None` when no access key pair is configured.
    pub fn s3(settings: &AwsSettings) -> Option<Arc<dyn ObjectStorage>> {
        let Some((access_key_id, secret_access_key)) = settings.credentials() else {
            tracing::debug!("AWS credentials not configured, S3 disabled");
            return None;
        };

        Some(Arc::new(S3ObjectStorage::new(S3Credentials {
            access_key_id: access_key_id.to_string(),
            secret_access_key: secret_access_key.to_string(),
            session_token: settings.session_token.clone().filter(|t| !t.is_empty()),
            region: settings.region.clone(),
            endpoint: settings.s3_endpoint.clone().filter(|e| !e.is_empty()),
        })))
    }

    /// Azure Blob storage, or `None` when no connection string is configured.
    /// A connection string that is present but malformed is an error.
    pub fn azure(
        settings: &AzureSettings,
    ) -> Result<Option<Arc<dyn ObjectStorage>>, StorageError> {
        let Some(connection_string) = settings
            .connection_string
            .as_deref()
            .filter(|c| !c.is_empty())
        else {
            tracing::debug!("Azure connection string not configured, Azure Blob disabled");
            return Ok(None);
        };

        let storage = AzureBlobStorage::from_connection_string(connection_string)?;
        Ok(Some(Arc::new(storage)))
    }
}
