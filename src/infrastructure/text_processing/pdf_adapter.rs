use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use async_trait::async_trait;
use lopdf::{Dictionary, Object};
use serde_json::{Map, Value};

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{ContentType, Document, Metadata};

const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Default)]
pub struct PdfAdapter;

struct PageContent {
    page_number: u32,
    text: String,
}

impl PdfAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Parses the PDF and, when it carries an `/Encrypt` entry, tries the
    /// empty user password. Returns whether the file was encrypted as loaded,
    /// since decryption drops `/Encrypt` from the trailer.
    fn load(data: &[u8]) -> Result<(lopdf::Document, bool), FileLoaderError> {
        let mut doc = lopdf::Document::load_mem(data)
            .map_err(|e| FileLoaderError::ExtractionFailed(format!("failed to parse PDF: {e}")))?;

        let encrypted = doc.trailer.has(b"Encrypt");
        if encrypted {
            match doc.decrypt("") {
                Ok(()) => tracing::debug!("Decrypted PDF with empty user password"),
                Err(e) => tracing::warn!(error = %e, "Encrypted PDF needs a user password"),
            }
        }

        Ok((doc, encrypted))
    }

    fn extract_pages(data: &[u8]) -> Result<Vec<PageContent>, FileLoaderError> {
        let (doc, _) = Self::load(data)?;
        let mut pages = Vec::new();

        for page_number in doc.get_pages().into_keys() {
            // lopdf can panic on malformed content streams; treat that like any
            // other per-page failure.
            let extracted = catch_unwind(AssertUnwindSafe(|| doc.extract_text(&[page_number])));

            match extracted {
                Ok(Ok(text)) if !text.trim().is_empty() => {
                    pages.push(PageContent { page_number, text });
                }
                Ok(Ok(_)) => {}
                Ok(Err(e)) => {
                    tracing::warn!(page = page_number, error = %e, "Failed to extract page text");
                }
                Err(_) => {
                    tracing::warn!(page = page_number, "Page text extraction panicked");
                }
            }
        }

        Ok(pages)
    }

    fn read_metadata(data: &[u8]) -> Result<Metadata, FileLoaderError> {
        let (doc, encrypted) = Self::load(data)?;
        let mut metadata = Metadata::new();

        metadata.insert("num_pages".to_string(), Value::from(doc.get_pages().len()));
        metadata.insert("is_encrypted".to_string(), Value::Bool(encrypted));

        if let Some(info) = Self::info_dictionary(&doc) {
            let entries: Map<String, Value> = info
                .iter()
                .map(|(key, value)| {
                    (
                        String::from_utf8_lossy(key).into_owned(),
                        Value::String(stringify_object(value)),
                    )
                })
                .collect();

            if !entries.is_empty() {
                metadata.insert("pdf_metadata".to_string(), Value::Object(entries));
            }
        }

        Ok(metadata)
    }

    fn info_dictionary(doc: &lopdf::Document) -> Option<&Dictionary> {
        let info = doc.trailer.get(b"Info").ok()?;
        let resolved = match info {
            Object::Reference(id) => doc.get_object(*id).ok()?,
            other => other,
        };
        resolved.as_dict().ok()
    }

    async fn run_blocking<T, F>(data: &[u8], job: F) -> Result<T, FileLoaderError>
    where
        T: Send + 'static,
        F: FnOnce(&[u8]) -> Result<T, FileLoaderError> + Send + 'static,
    {
        let owned = data.to_vec();

        tokio::time::timeout(
            EXTRACTION_TIMEOUT,
            tokio::task::spawn_blocking(move || job(&owned)),
        )
        .await
        .map_err(|_| FileLoaderError::ExtractionFailed("PDF extraction timed out".to_string()))?
        .map_err(|e| FileLoaderError::ExtractionFailed(format!("task join error: {e}")))?
    }
}

/// Renders a document-info value as text. Strings starting with a UTF-16BE
/// byte order mark are decoded as such.
fn stringify_object(object: &Object) -> String {
    match object {
        Object::String(bytes, _) => decode_pdf_string(bytes),
        Object::Name(name) => String::from_utf8_lossy(name).into_owned(),
        Object::Integer(value) => value.to_string(),
        Object::Real(value) => value.to_string(),
        Object::Boolean(value) => value.to_string(),
        Object::Null => String::new(),
        other => format!("{other:?}"),
    }
}

fn decode_pdf_string(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn ensure_pdf(document: &Document) -> Result<(), FileLoaderError> {
    if document.file_type.content_type() != ContentType::Pdf {
        return Err(FileLoaderError::UnsupportedContentType(
            document.file_type.to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl FileLoader for PdfAdapter {
    #[tracing::instrument(skip(self, data), fields(filename = %document.filename))]
    async fn extract_text(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<String, FileLoaderError> {
        ensure_pdf(document)?;

        let pages = Self::run_blocking(data, Self::extract_pages).await?;

        let page_count = pages.len();
        tracing::info!(page_count, "PDF text extraction complete");

        Ok(pages
            .into_iter()
            .map(|p| format!("--- Página {} ---\n{}", p.page_number, p.text))
            .collect::<Vec<_>>()
            .join("\n\n"))
    }

    async fn extract_metadata(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<Metadata, FileLoaderError> {
        ensure_pdf(document)?;
        Self::run_blocking(data, Self::read_metadata).await
    }
}
