use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use hmac::{Hmac, Mac};
use object_store::azure::MicrosoftAzureBuilder;
use object_store::path::Path as StorePath;
use object_store::{ObjectStore, PutPayload};
use reqwest::{Client, StatusCode, Url};
use sha2::Sha256;

use crate::application::ports::{ObjectStorage, StorageError};
use crate::domain::PersistedLocation;

use super::azure_connection::AzureConnectionString;
use super::s3_store::{map_get_error, text_put_options};

const API_VERSION: &str = "2021-08-06";

/// Azure Blob Storage containers addressed by name at call time.
pub struct AzureBlobStorage {
    connection: AzureConnectionString,
    http: Client,
}

impl AzureBlobStorage {
    pub fn new(connection: AzureConnectionString) -> Self {
        Self {
            connection,
            http: Client::new(),
        }
    }

    pub fn from_connection_string(connection_string: &str) -> Result<Self, StorageError> {
        Ok(Self::new(AzureConnectionString::parse(connection_string)?))
    }

    fn store_for(&self, container: &str) -> Result<Arc<dyn ObjectStore>, StorageError> {
        if container.is_empty() {
            return Err(StorageError::InvalidInput("container name is empty".to_string()));
        }

        let mut builder = MicrosoftAzureBuilder::new()
            .with_account(&self.connection.account_name)
            .with_access_key(&self.connection.account_key)
            .with_container_name(container);

        if let Some(endpoint) = &self.connection.blob_endpoint {
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(endpoint.starts_with("http://"));
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::UploadFailed(format!("invalid Azure configuration: {e}")))?;
        Ok(Arc::new(store))
    }

    fn blob_uri(&self, container: &str, blob_name: &str) -> String {
        format!(
            "{}/{container}/{blob_name}",
            self.connection.blob_service_url()
        )
    }

    /// Creates the container through the Blob REST API. An existing container
    /// (409 Conflict) is not an error.
    #[tracing::instrument(skip(self))]
    pub async fn ensure_container(&self, container: &str) -> Result<(), StorageError> {
        let raw = format!("{}/{container}?restype=container", self.connection.blob_service_url());
        let url = Url::parse(&raw).map_err(|e| StorageError::InvalidInput(format!("{raw}: {e}")))?;

        let date = chrono::Utc::now()
            .format("%a, %d %b %Y %H:%M:%S GMT")
            .to_string();
        let authorization = self.shared_key_authorization("PUT", &url, &date)?;

        let response = self
            .http
            .put(url)
            .header("x-ms-date", &date)
            .header("x-ms-version", API_VERSION)
            .header("content-length", "0")
            .header("authorization", authorization)
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(format!("create container {container}: {e}")))?;

        match response.status() {
            StatusCode::CREATED => {
                tracing::info!(container, "Created blob container");
                Ok(())
            }
            StatusCode::CONFLICT => Ok(()),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(StorageError::UploadFailed(format!(
                    "create container {container}: HTTP {status}: {body}"
                )))
            }
        }
    }

    fn shared_key_authorization(
        &self,
        verb: &str,
        url: &Url,
        date: &str,
    ) -> Result<String, StorageError> {
        let account = &self.connection.account_name;
        let canonical_headers = format!("x-ms-date:{date}\nx-ms-version:{API_VERSION}\n");
        let canonical_resource = format!("/{account}{}\nrestype:container", url.path());

        // Verb, eleven standard headers (all empty here), then the canonical parts.
        let string_to_sign = format!(
            "{verb}\n\n\n\n\n\n\n\n\n\n\n\n{canonical_headers}{canonical_resource}"
        );

        let key = STANDARD
            .decode(&self.connection.account_key)
            .map_err(|e| StorageError::InvalidInput(format!("AccountKey is not base64: {e}")))?;
        let mut mac = Hmac::<Sha256>::new_from_slice(&key)
            .map_err(|e| StorageError::InvalidInput(e.to_string()))?;
        mac.update(string_to_sign.as_bytes());
        let signature = STANDARD.encode(mac.finalize().into_bytes());

        Ok(format!("SharedKey {account}:{signature}"))
    }
}

#[async_trait::async_trait]
impl ObjectStorage for AzureBlobStorage {
    #[tracing::instrument(skip(self))]
    async fn get(&self, container: &str, blob_name: &str) -> Result<Bytes, StorageError> {
        let store = self.store_for(container)?;
        let location = self.blob_uri(container, blob_name);

        let result = store
            .get(&StorePath::from(blob_name))
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
        container: &str,
        blob_name: &str,
        data: Bytes,
    ) -> Result<PersistedLocation, StorageError> {
        self.ensure_container(container).await?;
        let store = self.store_for(container)?;

        store
            .put_opts(
                &StorePath::from(blob_name),
                PutPayload::from(data),
                text_put_options(),
            )
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        Ok(PersistedLocation::new(self.blob_uri(container, blob_name)))
    }
}
