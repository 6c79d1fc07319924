use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{GenerationProvider, LlmClientError};
use crate::domain::{GenerationRequest, ProviderKind};
use crate::infrastructure::observability::sanitize_prompt;

use super::http_support::{send_json, trim_base_url};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const LIST_TIMEOUT: Duration = Duration::from_secs(10);

const MODELS: [&str; 6] = ["llama2", "llama2:13b", "llama2:70b", "mistral", "codellama", "phi"];

/// Self-hosted inference server. Needs no credentials.
pub struct OllamaProvider {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

#[derive(Serialize)]
struct GenerateOptions {
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

impl OllamaProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: trim_base_url(base_url),
        }
    }

    /// Models installed on the server, from `GET /api/tags`.
    pub async fn fetch_models(&self) -> Result<Vec<String>, LlmClientError> {
        let response: TagsResponse = send_json(
            self.client.get(format!("{}/api/tags", self.base_url)),
            LIST_TIMEOUT,
        )
        .await?;

        Ok(response.models.into_iter().map(|m| m.name).collect())
    }
}

#[async_trait]
impl GenerationProvider for OllamaProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ollama
    }

    #[tracing::instrument(skip(self, request), fields(provider = "ollama", model = %request.model_id))]
    async fn generate_response(
        &self,
        request: &GenerationRequest,
    ) -> Result<String, LlmClientError> {
        tracing::debug!(prompt = %sanitize_prompt(&request.prompt), "Sending generate request");

        let body = GenerateRequest {
            model: &request.model_id,
            prompt: &request.prompt,
            stream: false,
            options: request
                .max_tokens
                .filter(|n| *n > 0)
                .map(|num_predict| GenerateOptions { num_predict }),
        };

        let response: GenerateResponse = send_json(
            self.client
                .post(format!("{}/api/generate", self.base_url))
                .json(&body),
            REQUEST_TIMEOUT,
        )
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Ollama request failed"))?;

        Ok(response.response)
    }

    fn available_models(&self) -> Vec<String> {
        MODELS.iter().map(|m| m.to_string()).collect()
    }

    async fn list_models(&self) -> Vec<String> {
        match self.fetch_models().await {
            Ok(models) => models,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to list Ollama models, using catalogue");
                self.available_models()
            }
        }
    }
}
