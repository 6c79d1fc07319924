mod file_loader;
mod format_error;
mod llm_client;
mod object_storage;
mod provider_factory;
mod source_error;

pub use file_loader::{FileLoader, FileLoaderError};
pub use format_error::FormatError;
pub use llm_client::{GenerationProvider, LlmClientError};
pub use object_storage::{ObjectStorage, StorageError};
pub use provider_factory::ProviderFactory;
pub use source_error::SourceError;
