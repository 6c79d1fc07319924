use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{GenerationProvider, LlmClientError};
use crate::domain::{GenerationRequest, ProviderKind};
use crate::infrastructure::observability::sanitize_prompt;

use super::http_support::{require_key, send_json, trim_base_url};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const MODELS: [&str; 4] = ["gpt-4", "gpt-4-turbo-preview", "gpt-3.5-turbo", "gpt-3.5-turbo-16k"];

pub struct OpenAiProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiProvider {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: trim_base_url(base_url),
        }
    }
}

#[async_trait]
impl GenerationProvider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    #[tracing::instrument(skip(self, request), fields(provider = "openai", model = %request.model_id))]
    async fn generate_response(
        &self,
        request: &GenerationRequest,
    ) -> Result<String, LlmClientError> {
        let api_key = require_key(self.api_key.as_deref(), "openai")?;

        tracing::debug!(prompt = %sanitize_prompt(&request.prompt), "Sending chat completion");

        let body = ChatCompletionRequest {
            model: &request.model_id,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_tokens.filter(|n| *n > 0),
        };

        let response: ChatCompletionResponse = send_json(
            self.client
                .post(format!("{}/chat/completions", self.base_url))
                .bearer_auth(api_key)
                .json(&body),
            REQUEST_TIMEOUT,
        )
        .await
        .inspect_err(|e| tracing::error!(error = %e, "OpenAI request failed"))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                LlmClientError::InvalidResponse("no message content in first choice".to_string())
            })
    }

    fn available_models(&self) -> Vec<String> {
        MODELS.iter().map(|m| m.to_string()).collect()
    }
}
