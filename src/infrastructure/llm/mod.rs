mod anthropic_provider;
pub mod aws_sigv4;
mod bedrock_provider;
mod http_support;
mod ollama_provider;
mod openai_provider;
mod provider_factory;

pub use anthropic_provider::AnthropicProvider;
pub use bedrock_provider::BedrockProvider;
pub use ollama_provider::OllamaProvider;
pub use openai_provider::OpenAiProvider;
pub use provider_factory::SettingsProviderFactory;
