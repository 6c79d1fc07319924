mod extraction_service;
mod field_extractor;
mod ingestion_service;
mod output_formatter;
mod prompt_library;
mod provider_gateway;
mod provider_registry;
mod storage_service;

pub use extraction_service::ExtractionService;
pub use field_extractor::{FieldExtraction, FieldExtractor, parse_json_object};
pub use ingestion_service::IngestionService;
pub use output_formatter::OutputFormatter;
pub use prompt_library::{PromptError, PromptLibrary};
pub use provider_gateway::ProviderGateway;
pub use provider_registry::ProviderRegistry;
pub use storage_service::StorageService;
