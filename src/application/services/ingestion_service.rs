use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::join_all;

use crate::application::ports::{ObjectStorage, SourceError, StorageError};
use crate::domain::{RawFile, SourceKind, SourceParams};

/// Source reader: fetches raw bytes from any supported origin.
pub struct IngestionService {
    s3: Option<Arc<dyn ObjectStorage>>,
    azure: Option<Arc<dyn ObjectStorage>>,
}

impl IngestionService {
    pub fn new(s3: Option<Arc<dyn ObjectStorage>>, azure: Option<Arc<dyn ObjectStorage>>) -> Self {
        Self { s3, azure }
    }

    #[tracing::instrument(skip(self, params), fields(source = %kind))]
    pub async fn ingest(
        &self,
        kind: SourceKind,
        params: SourceParams,
    ) -> Result<RawFile, SourceError> {
        let result = match kind {
            SourceKind::Upload => Self::from_upload(params),
            SourceKind::LocalPath | SourceKind::NetworkPath => {
                let path = params.path.ok_or_else(|| {
                    SourceError::InvalidInput(format!("path is required for {kind}"))
                })?;
                Self::read_path(&path).await
            }
            SourceKind::S3 | SourceKind::Azure => {
                let (bucket, key) = match (params.bucket, params.key) {
                    (Some(bucket), Some(key)) => (bucket, key),
                    _ => {
                        return Err(SourceError::InvalidInput(format!(
                            "bucket and key are required for {kind}"
                        )));
                    }
                };
                self.read_object(kind, &bucket, &key).await
            }
        };

        match &result {
            Ok(file) => {
                tracing::info!(file_name = %file.name, size = file.size_bytes(), "File ingested")
            }
            Err(e) => tracing::error!(error = %e, "File ingestion failed"),
        }
        result
    }

    /// Reads several inputs of one kind. Only upload and path kinds are
    /// accepted. Every parameter set is validated before any read starts and
    /// the first failure fails the whole batch.
    #[tracing::instrument(skip(self, batch), fields(source = %kind, count = batch.len()))]
    pub async fn ingest_batch(
        &self,
        kind: SourceKind,
        batch: Vec<SourceParams>,
    ) -> Result<Vec<RawFile>, SourceError> {
        match kind {
            SourceKind::Upload => batch.into_iter().map(Self::from_upload).collect(),
            SourceKind::LocalPath | SourceKind::NetworkPath => {
                let paths = batch
                    .into_iter()
                    .map(|params| {
                        params.path.ok_or_else(|| {
                            SourceError::InvalidInput(format!("path is required for {kind}"))
                        })
                    })
                    .collect::<Result<Vec<PathBuf>, _>>()?;

                join_all(paths.iter().map(|path| Self::read_path(path)))
                    .await
                    .into_iter()
                    .collect()
            }
            SourceKind::S3 | SourceKind::Azure => Err(SourceError::InvalidInput(format!(
                "batch ingestion is not supported for {kind}"
            ))),
        }
    }

    fn from_upload(params: SourceParams) -> Result<RawFile, SourceError> {
        match (params.content, params.file_name) {
            (Some(content), Some(name)) => Ok(RawFile::new(content, name)),
            (None, _) => Err(SourceError::InvalidInput(
                "content is required for upload".to_string(),
            )),
            (_, None) => Err(SourceError::InvalidInput(
                "file name is required for upload".to_string(),
            )),
        }
    }

    async fn read_path(path: &Path) -> Result<RawFile, SourceError> {
        let content = match tokio::fs::read(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SourceError::NotFound(path.display().to_string()));
            }
            Err(e) => return Err(SourceError::Io(e)),
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                SourceError::InvalidInput(format!("{} has no file name", path.display()))
            })?;

        tracing::debug!(path = %path.display(), size = content.len(), "Read file from path");
        Ok(RawFile::new(content, name))
    }

    async fn read_object(
        &self,
        kind: SourceKind,
        bucket: &str,
        key: &str,
    ) -> Result<RawFile, SourceError> {
        let storage = match kind {
            SourceKind::S3 => self.s3.as_ref(),
            _ => self.azure.as_ref(),
        }
        .ok_or_else(|| SourceError::NotFound(format!("{kind} credentials are not configured")))?;

        let content = storage.get(bucket, key).await.map_err(|e| match e {
            StorageError::InvalidInput(message) => SourceError::InvalidInput(message),
            other => SourceError::NotFound(other.to_string()),
        })?;

        let name = key.rsplit('/').next().unwrap_or(key).to_string();
        Ok(RawFile::new(content.to_vec(), name))
    }
}
