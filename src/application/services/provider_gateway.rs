use std::sync::Arc;

use crate::application::ports::{GenerationProvider, LlmClientError, ProviderFactory};
use crate::domain::{GenerationRequest, ProviderKind};

use super::ProviderRegistry;

const CONTENT_PLACEHOLDER: &str = "{content}";
const DEFAULT_INSTRUCTION: &str = "Analise o seguinte documento e forneça um resumo detalhado:";

/// Resolves backend names to providers and forwards normalized requests.
pub struct ProviderGateway {
    factory: Arc<dyn ProviderFactory>,
    registry: Arc<ProviderRegistry>,
}

impl ProviderGateway {
    pub fn new(factory: Arc<dyn ProviderFactory>, registry: Arc<ProviderRegistry>) -> Self {
        Self { factory, registry }
    }

    pub fn available_providers() -> Vec<&'static str> {
        ProviderKind::ALL.iter().map(ProviderKind::as_str).collect()
    }

    /// Case-insensitive lookup. Providers are built on first use and reused
    /// for the lifetime of the registry.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn GenerationProvider>, LlmClientError> {
        let kind =
            ProviderKind::from_name(name).ok_or_else(|| LlmClientError::UnsupportedProvider {
                name: name.to_string(),
                available: Self::available_providers().join(", "),
            })?;

        self.registry
            .get_or_try_insert_with(kind, || self.factory.create(kind))
    }

    /// Final prompt text for `content`.
    ///
    /// A template containing `{content}` has it substituted; a template
    /// without the placeholder gets the content appended under a label; no
    /// template (or an empty one) falls back to a summary instruction.
    pub fn build_prompt(content: &str, template: Option<&str>) -> String {
        match template.filter(|t| !t.is_empty()) {
            Some(template) if template.contains(CONTENT_PLACEHOLDER) => {
                template.replace(CONTENT_PLACEHOLDER, content)
            }
            Some(template) => format!("{template}\n\nDocumento:\n{content}"),
            None => format!("{DEFAULT_INSTRUCTION}\n\n{content}"),
        }
    }

    #[tracing::instrument(skip(self, content, template), fields(content_length = content.len()))]
    pub async fn invoke(
        &self,
        content: &str,
        provider: &str,
        model: &str,
        template: Option<&str>,
        max_tokens: Option<u32>,
    ) -> Result<String, LlmClientError> {
        let backend = self.resolve(provider)?;
        let prompt = Self::build_prompt(content, template);

        tracing::info!(
            has_custom_prompt = template.is_some(),
            "Processing content with generation provider"
        );

        let request = GenerationRequest::new(prompt, model).with_max_tokens(max_tokens);
        backend.generate_response(&request).await
    }

    /// Models for a backend, live where the backend supports listing.
    pub async fn list_models(&self, provider: &str) -> Result<Vec<String>, LlmClientError> {
        Ok(self.resolve(provider)?.list_models().await)
    }
}
