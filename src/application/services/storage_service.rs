use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use futures::future::join_all;

use crate::application::ports::{ObjectStorage, StorageError};
use crate::domain::{BatchDestination, DestinationKind, DestinationParams, PersistedLocation};

/// Destination sink: persists formatted text to the filesystem or a remote store.
pub struct StorageService {
    output_dir: PathBuf,
    s3: Option<Arc<dyn ObjectStorage>>,
    azure: Option<Arc<dyn ObjectStorage>>,
}

impl StorageService {
    pub fn new(
        output_dir: impl Into<PathBuf>,
        s3: Option<Arc<dyn ObjectStorage>>,
        azure: Option<Arc<dyn ObjectStorage>>,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            s3,
            azure,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    #[tracing::instrument(skip(self, content, params), fields(destination = %kind, size = content.len()))]
    pub async fn save(
        &self,
        content: &str,
        name: &str,
        kind: DestinationKind,
        params: DestinationParams,
    ) -> Result<PersistedLocation, StorageError> {
        let result = match kind {
            DestinationKind::Local => {
                let directory = params.directory.unwrap_or_else(|| self.output_dir.clone());
                Self::write_file(&directory, name, content).await
            }
            DestinationKind::NetworkPath => {
                let directory = params.directory.ok_or_else(|| {
                    StorageError::InvalidInput("directory is required for network_path".to_string())
                })?;
                Self::write_file(&directory, name, content).await
            }
            DestinationKind::S3 => {
                let (bucket, key) = required_pair(kind, params.bucket, params.object_key, "bucket and object key")?;
                self.put_remote(kind, &bucket, &key, content).await
            }
            DestinationKind::Azure => {
                let (container, blob) = required_pair(kind, params.container, params.blob_name, "container and blob name")?;
                self.put_remote(kind, &container, &blob, content).await
            }
        };

        match &result {
            Ok(location) => tracing::info!(location = %location, "File saved"),
            Err(e) => tracing::error!(error = %e, "File save failed"),
        }
        result
    }

    /// Saves every `(content, name)` pair to one destination. Items that fail
    /// are logged and left out; the returned locations keep input order.
    #[tracing::instrument(skip(self, files, destination), fields(destination = %kind, count = files.len()))]
    pub async fn save_multiple_files(
        &self,
        files: Vec<(String, String)>,
        kind: DestinationKind,
        destination: &BatchDestination,
    ) -> Vec<PersistedLocation> {
        let saves = files.iter().map(|(content, name)| {
            let params = Self::batch_params(kind, destination, name);
            async move { (name, self.save(content, name, kind, params).await) }
        });

        let mut saved = Vec::with_capacity(files.len());
        for (name, result) in join_all(saves).await {
            match result {
                Ok(location) => saved.push(location),
                Err(e) => tracing::warn!(file_name = %name, error = %e, "Skipping file in batch save"),
            }
        }

        tracing::info!(saved = saved.len(), "Batch save finished");
        saved
    }

    fn batch_params(
        kind: DestinationKind,
        destination: &BatchDestination,
        name: &str,
    ) -> DestinationParams {
        match kind {
            DestinationKind::Local | DestinationKind::NetworkPath => DestinationParams {
                directory: destination.directory.clone(),
                ..DestinationParams::default()
            },
            DestinationKind::S3 => DestinationParams {
                bucket: destination.bucket.clone(),
                object_key: Some(destination.object_name(name)),
                ..DestinationParams::default()
            },
            DestinationKind::Azure => DestinationParams {
                container: destination.container.clone(),
                blob_name: Some(destination.object_name(name)),
                ..DestinationParams::default()
            },
        }
    }

    async fn write_file(
        directory: &Path,
        file_name: &str,
        content: &str,
    ) -> Result<PersistedLocation, StorageError> {
        tokio::fs::create_dir_all(directory)
            .await
            .map_err(|source| StorageError::DirectoryCreation {
                path: directory.to_path_buf(),
                source,
            })?;

        let path = directory.join(file_name);
        tokio::fs::write(&path, content.as_bytes()).await?;

        Ok(PersistedLocation::new(path.to_string_lossy().into_owned()))
    }

    async fn put_remote(
        &self,
        kind: DestinationKind,
        bucket: &str,
        key: &str,
        content: &str,
    ) -> Result<PersistedLocation, StorageError> {
        let storage = match kind {
            DestinationKind::S3 => self.s3.as_ref(),
            _ => self.azure.as_ref(),
        }
        .ok_or_else(|| StorageError::MissingCredentials(format!("{kind} is not configured")))?;

        storage
            .put(bucket, key, Bytes::copy_from_slice(content.as_bytes()))
            .await
    }
}

fn required_pair(
    kind: DestinationKind,
    first: Option<String>,
    second: Option<String>,
    what: &str,
) -> Result<(String, String), StorageError> {
    match (first, second) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(StorageError::InvalidInput(format!("{what} are required for {kind}"))),
    }
}
