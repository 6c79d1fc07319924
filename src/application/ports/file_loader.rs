use async_trait::async_trait;

use crate::domain::{Document, ErrorKind, Metadata};

#[async_trait]
pub trait FileLoader: Send + Sync {
    async fn extract_text(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<String, FileLoaderError>;

    /// Format-specific structural metadata. Callers merge it over the base
    /// file metadata, so loaders only return their own keys.
    async fn extract_metadata(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<Metadata, FileLoaderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FileLoaderError {
    #[error("unsupported file format: {extension}. Supported: {supported}")]
    UnsupportedFormat {
        extension: String,
        supported: String,
    },
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),
    #[error("could not decode text with any of: {0}")]
    DecodeFailed(String),
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),
}

impl FileLoaderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedFormat { .. } | Self::UnsupportedContentType(_) => {
                ErrorKind::UnsupportedFormat
            }
            Self::DecodeFailed(_) | Self::ExtractionFailed(_) => ErrorKind::DecodeError,
        }
    }
}
