use std::time::Duration;

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::application::ports::LlmClientError;

/// Sends a JSON request and decodes a JSON reply, normalizing transport and
/// status failures into `LlmClientError`.
pub(super) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    timeout: Duration,
) -> Result<T, LlmClientError> {
    let response = request
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| transport_error(e, timeout))?;

    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(LlmClientError::RateLimited);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(LlmClientError::ApiRequestFailed(format!(
            "HTTP {}: {}",
            status, body
        )));
    }

    response
        .json()
        .await
        .map_err(|e| LlmClientError::InvalidResponse(e.to_string()))
}

pub(super) fn transport_error(error: reqwest::Error, timeout: Duration) -> LlmClientError {
    if error.is_timeout() {
        LlmClientError::Timeout(timeout.as_secs())
    } else {
        LlmClientError::ApiRequestFailed(error.to_string())
    }
}

pub(super) fn require_key(api_key: Option<&str>, provider: &str) -> Result<String, LlmClientError> {
    api_key
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .ok_or_else(|| LlmClientError::MissingCredentials(provider.to_string()))
}

pub(super) fn trim_base_url(base_url: impl Into<String>) -> String {
    base_url.into().trim_end_matches('/').to_string()
}
