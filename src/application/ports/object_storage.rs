use std::io;
use std::path::PathBuf;

use bytes::Bytes;

use crate::domain::{ErrorKind, PersistedLocation};

/// Bucket or container addressed object store.
#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes, StorageError>;

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
    ) -> Result<PersistedLocation, StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("missing credentials: {0}")]
    MissingCredentials(String),
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("download failed: {0}")]
    DownloadFailed(String),
    #[error("could not create directory {}: {source}", path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl StorageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::MissingCredentials(_) => ErrorKind::MissingCredentials,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::UploadFailed(_)
            | Self::DownloadFailed(_)
            | Self::DirectoryCreation { .. }
            | Self::Io(_) => ErrorKind::IoError,
        }
    }
}
