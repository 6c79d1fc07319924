use std::sync::Arc;

use chrono::Utc;
use serde_json::{Value, json};

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{Document, ExtractedDocument, FileType, Metadata, RawFile, extension_of};

/// Extraction engine: turns raw document bytes into text plus metadata.
pub struct ExtractionService {
    file_loader: Arc<dyn FileLoader>,
}

impl ExtractionService {
    pub fn new(file_loader: Arc<dyn FileLoader>) -> Self {
        Self { file_loader }
    }

    pub fn supported_extensions() -> Vec<&'static str> {
        FileType::supported_extensions()
    }

    pub async fn process_file(&self, file: &RawFile) -> Result<ExtractedDocument, FileLoaderError> {
        self.process(&file.content, &file.name).await
    }

    #[tracing::instrument(skip(self, data), fields(size = data.len()))]
    pub async fn process(
        &self,
        data: &[u8],
        file_name: &str,
    ) -> Result<ExtractedDocument, FileLoaderError> {
        let extension = extension_of(file_name);
        let file_type =
            FileType::from_extension(&extension).ok_or_else(|| FileLoaderError::UnsupportedFormat {
                extension: extension.clone(),
                supported: Self::supported_extensions().join(", "),
            })?;

        let size_bytes = data.len() as u64;
        let document = Document::new(file_name, file_type, size_bytes);

        let content = self
            .file_loader
            .extract_text(data, &document)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to extract text"))?;

        let mut metadata = base_metadata(file_name, &extension, size_bytes);
        match self.file_loader.extract_metadata(data, &document).await {
            Ok(extra) => metadata.extend(extra),
            Err(e) => tracing::warn!(error = %e, "Failed to extract metadata, keeping base fields"),
        }

        tracing::info!(content_length = content.len(), "File processed");

        Ok(ExtractedDocument {
            content,
            metadata,
            file_name: file_name.to_string(),
            size_bytes,
            file_type,
            processed_at: Utc::now(),
        })
    }
}

fn base_metadata(file_name: &str, extension: &str, size_bytes: u64) -> Metadata {
    let size_mb = (size_bytes as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0;

    let mut metadata = Metadata::new();
    metadata.insert("file_name".to_string(), Value::String(file_name.to_string()));
    metadata.insert(
        "file_extension".to_string(),
        Value::String(extension.to_string()),
    );
    metadata.insert("file_size_bytes".to_string(), json!(size_bytes));
    metadata.insert("file_size_mb".to_string(), json!(size_mb));
    metadata
}
