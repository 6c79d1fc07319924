use std::sync::Arc;

use crate::domain::ProviderKind;

use super::llm_client::{GenerationProvider, LlmClientError};

/// Builds a provider for a backend from whatever configuration the
/// implementation was constructed with.
pub trait ProviderFactory: Send + Sync {
    fn create(&self, kind: ProviderKind) -> Result<Arc<dyn GenerationProvider>, LlmClientError>;
}
