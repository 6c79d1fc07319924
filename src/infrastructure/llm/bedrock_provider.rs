use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::application::ports::{GenerationProvider, LlmClientError};
use crate::domain::{GenerationRequest, ProviderKind};
use crate::infrastructure::observability::sanitize_prompt;

use super::aws_sigv4::{AwsCredentials, SigV4Signer, encode_segment};
use super::http_support::trim_base_url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const SERVICE: &str = "bedrock";
const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";
const DEFAULT_MAX_TOKENS: u32 = 4096;
const CONTENT_TYPE: &str = "application/json";

const MODELS: [&str; 7] = [
    "anthropic.claude-v2",
    "anthropic.claude-v2:1",
    "anthropic.claude-instant-v1",
    "amazon.titan-text-lite-v1",
    "amazon.titan-text-express-v1",
    "ai21.j2-ultra",
    "ai21.j2-mid",
];

/// Managed model invocation. The HTTP call is synchronous and runs on the
/// blocking thread pool so it never stalls the async executor.
pub struct BedrockProvider {
    access_key_id: Option<String>,
    secret_access_key: Option<String>,
    session_token: Option<String>,
    region: String,
    endpoint: String,
}

#[derive(Deserialize)]
struct ClaudeResponse {
    content: Vec<ClaudeContent>,
}

#[derive(Deserialize)]
struct ClaudeContent {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct TextGenerationResponse {
    #[serde(default)]
    results: Vec<TextGenerationResult>,
}

#[derive(Deserialize)]
struct TextGenerationResult {
    #[serde(rename = "outputText", default)]
    output_text: String,
}

/// Request body shape, chosen by model identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModelFamily {
    Claude,
    TextGeneration,
}

impl ModelFamily {
    fn of(model_id: &str) -> Self {
        if model_id.to_lowercase().contains("claude") {
            Self::Claude
        } else {
            Self::TextGeneration
        }
    }

    fn request_body(self, prompt: &str, max_tokens: u32) -> Value {
        match self {
            Self::Claude => json!({
                "anthropic_version": ANTHROPIC_VERSION,
                "max_tokens": max_tokens,
                "messages": [{"role": "user", "content": prompt}],
            }),
            Self::TextGeneration => json!({
                "inputText": prompt,
                "textGenerationConfig": {"maxTokenCount": max_tokens},
            }),
        }
    }

    fn response_text(self, body: &[u8]) -> Result<String, LlmClientError> {
        match self {
            Self::Claude => {
                let response: ClaudeResponse = serde_json::from_slice(body)
                    .map_err(|e| LlmClientError::InvalidResponse(e.to_string()))?;
                response
                    .content
                    .into_iter()
                    .next()
                    .and_then(|c| c.text)
                    .ok_or_else(|| {
                        LlmClientError::InvalidResponse("no text in first content block".to_string())
                    })
            }
            Self::TextGeneration => {
                let response: TextGenerationResponse = serde_json::from_slice(body)
                    .map_err(|e| LlmClientError::InvalidResponse(e.to_string()))?;
                Ok(response
                    .results
                    .into_iter()
                    .next()
                    .map(|r| r.output_text)
                    .unwrap_or_default())
            }
        }
    }
}

struct Invocation {
    url: Url,
    body: Vec<u8>,
    signer: SigV4Signer,
    family: ModelFamily,
}

impl BedrockProvider {
    pub fn new(
        access_key_id: Option<String>,
        secret_access_key: Option<String>,
        region: impl Into<String>,
        endpoint: Option<String>,
    ) -> Self {
        let region = region.into();
        let endpoint = endpoint
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| format!("https://bedrock-runtime.{region}.amazonaws.com"));

        Self {
            access_key_id,
            secret_access_key,
            session_token: None,
            region,
            endpoint: trim_base_url(endpoint),
        }
    }

    pub fn with_session_token(mut self, session_token: Option<String>) -> Self {
        self.session_token = session_token.filter(|t| !t.is_empty());
        self
    }

    fn credentials(&self) -> Result<AwsCredentials, LlmClientError> {
        match (
            self.access_key_id.as_deref().filter(|k| !k.is_empty()),
            self.secret_access_key.as_deref().filter(|k| !k.is_empty()),
        ) {
            (Some(access_key_id), Some(secret_access_key)) => Ok(AwsCredentials {
                access_key_id: access_key_id.to_string(),
                secret_access_key: secret_access_key.to_string(),
                session_token: self.session_token.clone(),
            }),
            _ => Err(LlmClientError::MissingCredentials("bedrock".to_string())),
        }
    }

    fn invoke_url(&self, model_id: &str) -> Result<Url, LlmClientError> {
        let raw = format!("{}/model/{}/invoke", self.endpoint, encode_segment(model_id));
        Url::parse(&raw).map_err(|e| LlmClientError::ApiRequestFailed(format!("{raw}: {e}")))
    }

    fn invoke_blocking(invocation: Invocation) -> Result<String, LlmClientError> {
        let headers = invocation
            .signer
            .sign(
                "POST",
                &invocation.url,
                &[("content-type", CONTENT_TYPE)],
                &invocation.body,
                chrono::Utc::now(),
            )
            .map_err(|e| LlmClientError::ApiRequestFailed(e.to_string()))?;

        // Built and dropped on this worker thread; the blocking client owns a
        // runtime that must not be dropped inside async context.
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LlmClientError::ApiRequestFailed(e.to_string()))?;

        let mut request = client
            .post(invocation.url)
            .header("content-type", CONTENT_TYPE)
            .header("accept", CONTENT_TYPE);
        for (name, value) in headers {
            request = request.header(name, value);
        }

        let response = request.body(invocation.body).send().map_err(|e| {
            if e.is_timeout() {
                LlmClientError::Timeout(REQUEST_TIMEOUT.as_secs())
            } else {
                LlmClientError::ApiRequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmClientError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmClientError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let body = response
            .bytes()
            .map_err(|e| LlmClientError::InvalidResponse(e.to_string()))?;
        invocation.family.response_text(&body)
    }
}

#[async_trait]
impl GenerationProvider for BedrockProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Bedrock
    }

    #[tracing::instrument(skip(self, request), fields(provider = "bedrock", model = %request.model_id))]
    async fn generate_response(
        &self,
        request: &GenerationRequest,
    ) -> Result<String, LlmClientError> {
        let credentials = self.credentials()?;

        tracing::debug!(prompt = %sanitize_prompt(&request.prompt), "Invoking model");

        let family = ModelFamily::of(&request.model_id);
        let max_tokens = request
            .max_tokens
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_TOKENS);
        let body = serde_json::to_vec(&family.request_body(&request.prompt, max_tokens))
            .map_err(|e| LlmClientError::ApiRequestFailed(e.to_string()))?;

        let invocation = Invocation {
            url: self.invoke_url(&request.model_id)?,
            body,
            signer: SigV4Signer::new(credentials, self.region.clone(), SERVICE),
            family,
        };

        tokio::task::spawn_blocking(move || Self::invoke_blocking(invocation))
            .await
            .map_err(|e| LlmClientError::WorkerFailed(e.to_string()))?
            .inspect_err(|e| tracing::error!(error = %e, "Bedrock invocation failed"))
    }

    fn available_models(&self) -> Vec<String> {
        MODELS.iter().map(|m| m.to_string()).collect()
    }
}
