use std::sync::Arc;

use crate::application::ports::StorageError;
use crate::application::services::{
    ExtractionService, IngestionService, PromptLibrary, ProviderGateway, ProviderRegistry,
    StorageService,
};
use crate::infrastructure::llm::SettingsProviderFactory;
use crate::infrastructure::storage::ObjectStorageFactory;
use crate::infrastructure::text_processing::ExtractorFactory;
use crate::presentation::config::Settings;

/// Services wired from one set of settings, shared by every caller.
#[derive(Clone)]
pub struct AppState {
    pub ingestion_service: Arc<IngestionService>,
    pub extraction_service: Arc<ExtractionService>,
    pub provider_gateway: Arc<ProviderGateway>,
    pub storage_service: Arc<StorageService>,
    pub prompt_library: Arc<PromptLibrary>,
    pub settings: Settings,
}

impl AppState {
    /// Fails only when a configured Azure connection string is malformed.
    /// Backends without credentials are wired as absent.
    pub fn from_settings(settings: Settings) -> Result<Self, StorageError> {
        let s3 = ObjectStorageFactory::s3(&settings.aws);
        let azure = ObjectStorageFactory::azure(&settings.azure)?;

        let factory = Arc::new(SettingsProviderFactory::new(
            settings.llm.clone(),
            settings.aws.clone(),
        ));

        Ok(Self {
            ingestion_service: Arc::new(IngestionService::new(s3.clone(), azure.clone())),
            extraction_service: Arc::new(ExtractionService::new(ExtractorFactory::create())),
            provider_gateway: Arc::new(ProviderGateway::new(
                factory,
                Arc::new(ProviderRegistry::new()),
            )),
            storage_service: Arc::new(StorageService::new(
                settings.paths.output_dir.clone(),
                s3,
                azure,
            )),
            prompt_library: Arc::new(PromptLibrary::new()),
            settings,
        })
    }
}
