use std::path::PathBuf;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_AWS_REGION: &str = "us-east-1";
const DEFAULT_MAX_FILE_SIZE_MB: u64 = 50;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub llm: LlmSettings,
    pub aws: AwsSettings,
    pub azure: AzureSettings,
    pub s3: S3Settings,
    pub paths: PathSettings,
    pub limits: LimitSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub openai: OpenAiSettings,
    pub anthropic: AnthropicSettings,
    pub ollama: OllamaSettings,
    pub bedrock: BedrockSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OpenAiSettings {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnthropicSettings {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for AnthropicSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_ANTHROPIC_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OllamaSettings {
    pub base_url: String,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BedrockSettings {
    /// Overrides `https://bedrock-runtime.{region}.amazonaws.com`.
    pub endpoint_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AwsSettings {
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
    pub region: String,
    /// Custom S3-compatible endpoint, e.g. MinIO or LocalStack.
    pub s3_endpoint: Option<String>,
}

impl Default for AwsSettings {
    fn default() -> Self {
        Self {
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
            region: DEFAULT_AWS_REGION.to_string(),
            s3_endpoint: None,
        }
    }
}

impl AwsSettings {
    /// Access key pair, if both halves are configured and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let access_key = self.access_key_id.as_deref().filter(|k| !k.is_empty())?;
        let secret_key = self.secret_access_key.as_deref().filter(|k| !k.is_empty())?;
        Some((access_key, secret_key))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AzureSettings {
    pub connection_string: Option<String>,
    pub container_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct S3Settings {
    pub bucket_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    pub upload_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("./uploads"),
            output_dir: PathBuf::from("./outputs"),
        }
    }
}

/// Limits enforced by callers before ingestion; the core does not check them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitSettings {
    pub max_file_size_mb: u64,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
        }
    }
}

impl LimitSettings {
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb * 1024 * 1024
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info,docpipe=debug".to_string(),
            json: false,
        }
    }
}

impl Settings {
    /// Loads `.env`, the optional `appsettings.{environment}` file and `APP_`
    /// prefixed environment variables, in increasing order of precedence.
    /// Nested keys use `__`, e.g. `APP_LLM__OPENAI__API_KEY`.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = Environment::from_process_env()?;
        tracing::debug!(%environment, "Loading settings");

        let configuration = Config::builder()
            .add_source(File::with_name(&environment.settings_file()).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::from_config(configuration)
    }

    pub fn from_config(configuration: Config) -> Result<Self, ConfigError> {
        configuration.try_deserialize()
    }
}
