mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    AnthropicSettings, AwsSettings, AzureSettings, BedrockSettings, LimitSettings, LlmSettings,
    LoggingSettings, OllamaSettings, OpenAiSettings, PathSettings, S3Settings, Settings,
};
