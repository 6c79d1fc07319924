use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{GenerationProvider, LlmClientError};
use crate::domain::{GenerationRequest, ProviderKind};
use crate::infrastructure::observability::sanitize_prompt;

use super::http_support::{require_key, send_json, trim_base_url};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 4096;

const MODELS: [&str; 9] = [
    "claude-3-5-sonnet-20241022",
    "claude-3-5-sonnet-20240620",
    "claude-3-5-sonnet",
    "claude-3-5-haiku-20241022",
    "claude-3-5-haiku-20240620",
    "claude-3-5-haiku",
    "claude-3-opus-20240229",
    "claude-3-sonnet-20240229",
    "claude-3-haiku-20240307",
];

pub struct AnthropicProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicProvider {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: trim_base_url(base_url),
        }
    }
}

#[async_trait]
impl GenerationProvider for AnthropicProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    #[tracing::instrument(skip(self, request), fields(provider = "anthropic", model = %request.model_id))]
    async fn generate_response(
        &self,
        request: &GenerationRequest,
    ) -> Result<String, LlmClientError> {
        let api_key = require_key(self.api_key.as_deref(), "anthropic")?;

        tracing::debug!(prompt = %sanitize_prompt(&request.prompt), "Sending messages request");

        let body = MessagesRequest {
            model: &request.model_id,
            messages: vec![Message {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request
                .max_tokens
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_MAX_TOKENS),
        };

        let response: MessagesResponse = send_json(
            self.client
                .post(format!("{}/messages", self.base_url))
                .header("x-api-key", api_key)
                .header("anthropic-version", API_VERSION)
                .json(&body),
            REQUEST_TIMEOUT,
        )
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Anthropic request failed"))?;

        response
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or_else(|| {
                LlmClientError::InvalidResponse("no text in first content block".to_string())
            })
    }

    fn available_models(&self) -> Vec<String> {
        MODELS.iter().map(|m| m.to_string()).collect()
    }
}
