use std::sync::Arc;

use crate::application::ports::{GenerationProvider, LlmClientError, ProviderFactory};
use crate::domain::ProviderKind;
use crate::presentation::config::{AwsSettings, LlmSettings};

use super::{AnthropicProvider, BedrockProvider, OllamaProvider, OpenAiProvider};

/// Constructs providers from loaded settings. Credentials are not validated
/// here; each provider rejects a call when its credentials are absent.
pub struct SettingsProviderFactory {
    llm: LlmSettings,
    aws: AwsSettings,
}

impl SettingsProviderFactory {
    pub fn new(llm: LlmSettings, aws: AwsSettings) -> Self {
        Self { llm, aws }
    }
}

impl ProviderFactory for SettingsProviderFactory {
    fn create(&self, kind: ProviderKind) -> Result<Arc<dyn GenerationProvider>, LlmClientError> {
        tracing::info!(provider = %kind, "Creating generation provider");

        let provider: Arc<dyn GenerationProvider> = match kind {
            ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(
                self.llm.openai.api_key.clone(),
                self.llm.openai.base_url.clone(),
            )),
            ProviderKind::Anthropic => Arc::new(AnthropicProvider::new(
                self.llm.anthropic.api_key.clone(),
                self.llm.anthropic.base_url.clone(),
            )),
            ProviderKind::Ollama => Arc::new(OllamaProvider::new(self.llm.ollama.base_url.clone())),
            ProviderKind::Bedrock => Arc::new(
                BedrockProvider::new(
                    self.aws.access_key_id.clone(),
                    self.aws.secret_access_key.clone(),
                    self.aws.region.clone(),
                    self.llm.bedrock.endpoint_url.clone(),
                )
                .with_session_token(self.aws.session_token.clone()),
            ),
        };

        Ok(provider)
    }
}
