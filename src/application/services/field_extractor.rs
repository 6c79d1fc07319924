use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::application::ports::LlmClientError;
use crate::domain::GenerationRequest;

use super::ProviderGateway;

const SYSTEM_INSTRUCTION: &str = "You are a helpful assistant that extracts structured information from text. Respond only with JSON format.";
const OUTPUT_INSTRUCTION: &str = "Provide the extracted information as a JSON object with the specified fields as keys. If a field cannot be found, use null as the value. Return only the JSON object, nothing else.";
const EXTRACTION_MAX_TOKENS: u32 = 1000;

static FENCED_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").unwrap());

/// Outcome of a structured extraction. Failures are reported in `error`
/// rather than returned as `Err`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldExtraction {
    pub success: bool,
    pub data: Map<String, Value>,
    pub error: Option<String>,
    pub raw_response: Option<String>,
}

impl FieldExtraction {
    fn failed(error: impl Into<String>, raw_response: Option<String>) -> Self {
        Self {
            success: false,
            data: Map::new(),
            error: Some(error.into()),
            raw_response,
        }
    }
}

/// Pulls named fields out of free text through a generation backend.
pub struct FieldExtractor {
    gateway: Arc<ProviderGateway>,
    provider: String,
    model: String,
}

impl FieldExtractor {
    pub fn new(
        gateway: Arc<ProviderGateway>,
        provider: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            provider: provider.into(),
            model: model.into(),
        }
    }

    pub async fn extract(
        &self,
        text: &str,
        fields: &[&str],
        instructions: Option<&str>,
    ) -> FieldExtraction {
        let field_lines = vec![format!("Fields to extract: {}", fields.join(", "))];
        self.run(build_prompt(text, &field_lines, instructions)).await
    }

    /// Like [`extract`](Self::extract), with a description for each field.
    pub async fn extract_with_schema(
        &self,
        text: &str,
        schema: &[(&str, &str)],
        instructions: Option<&str>,
    ) -> FieldExtraction {
        let mut field_lines = vec!["Fields to extract:".to_string()];
        field_lines.extend(
            schema
                .iter()
                .map(|(field, description)| format!("- {field}: {description}")),
        );
        self.run(build_prompt(text, &field_lines, instructions)).await
    }

    #[tracing::instrument(skip(self, prompt), fields(provider = %self.provider, model = %self.model))]
    async fn run(&self, prompt: String) -> FieldExtraction {
        let raw_response = match self.generate(prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "Field extraction request failed");
                return FieldExtraction::failed(e.to_string(), None);
            }
        };

        match parse_json_object(&raw_response) {
            Some(data) => FieldExtraction {
                success: true,
                data,
                error: None,
                raw_response: Some(raw_response),
            },
            None => FieldExtraction::failed(
                "Failed to parse JSON from LLM response",
                Some(raw_response),
            ),
        }
    }

    async fn generate(&self, prompt: String) -> Result<String, LlmClientError> {
        let provider = self.gateway.resolve(&self.provider)?;
        let request =
            GenerationRequest::new(format!("{SYSTEM_INSTRUCTION}\n\n{prompt}"), &self.model)
                .with_max_tokens(Some(EXTRACTION_MAX_TOKENS));
        provider.generate_response(&request).await
    }
}

fn build_prompt(text: &str, field_lines: &[String], instructions: Option<&str>) -> String {
    let mut parts: Vec<String> = vec![
        "Extract the following information from the text below:".to_string(),
        String::new(),
    ];
    parts.extend(field_lines.iter().cloned());
    parts.push(String::new());

    if let Some(instructions) = instructions.filter(|i| !i.is_empty()) {
        parts.push(format!("Additional instructions: {instructions}"));
        parts.push(String::new());
    }

    parts.push("Text:".to_string());
    parts.push(text.to_string());
    parts.push(String::new());
    parts.push(OUTPUT_INSTRUCTION.to_string());

    parts.join("\n")
}

/// Parses a JSON object from the raw reply, directly or from a fenced block.
pub fn parse_json_object(raw: &str) -> Option<Map<String, Value>> {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(raw.trim()) {
        return Some(map);
    }

    let captured = FENCED_JSON.captures(raw)?.get(1)?.as_str();
    match serde_json::from_str::<Value>(captured) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}
