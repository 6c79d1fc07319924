use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{ContentType, Document, Metadata};

pub struct CompositeFileLoader {
    adapters: HashMap<ContentType, Arc<dyn FileLoader>>,
}

impl CompositeFileLoader {
    pub fn new(adapters: Vec<(ContentType, Arc<dyn FileLoader>)>) -> Self {
        Self {
            adapters: adapters.into_iter().collect(),
        }
    }

    fn adapter_for(&self, document: &Document) -> Result<&Arc<dyn FileLoader>, FileLoaderError> {
        self.adapters
            .get(&document.file_type.content_type())
            .ok_or_else(|| FileLoaderError::UnsupportedContentType(document.file_type.to_string()))
    }
}

#[async_trait]
impl FileLoader for CompositeFileLoader {
    async fn extract_text(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<String, FileLoaderError> {
        self.adapter_for(document)?
            .extract_text(data, document)
            .await
    }

    async fn extract_metadata(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<Metadata, FileLoaderError> {
        self.adapter_for(document)?
            .extract_metadata(data, document)
            .await
    }
}
