use async_trait::async_trait;

use crate::domain::{ErrorKind, GenerationRequest, ProviderKind};

/// One remote generation backend behind a normalized prompt-in, text-out call.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    async fn generate_response(&self, request: &GenerationRequest)
    -> Result<String, LlmClientError>;

    /// Hard-coded catalogue of known model identifiers. Not exhaustive.
    fn available_models(&self) -> Vec<String>;

    /// Models reported by the backend itself, where it supports listing.
    async fn list_models(&self) -> Vec<String> {
        self.available_models()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LlmClientError {
    #[error("unsupported provider: {name}. Available: {available}")]
    UnsupportedProvider { name: String, available: String },
    #[error("missing credentials for {0}")]
    MissingCredentials(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("request timed out after {0}s")]
    Timeout(u64),
    #[error("worker failed: {0}")]
    WorkerFailed(String),
}

impl LlmClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedProvider { .. } => ErrorKind::UnsupportedProvider,
            Self::MissingCredentials(_) => ErrorKind::MissingCredentials,
            Self::ApiRequestFailed(_)
            | Self::RateLimited
            | Self::InvalidResponse(_)
            | Self::Timeout(_)
            | Self::WorkerFailed(_) => ErrorKind::ProviderError,
        }
    }
}
