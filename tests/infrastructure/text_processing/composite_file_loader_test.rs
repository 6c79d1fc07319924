use std::sync::Arc;

use docpipe::application::ports::{FileLoader, FileLoaderError};
use docpipe::domain::{ContentType, Document, FileType};
use docpipe::infrastructure::text_processing::{
    CompositeFileLoader, ExtractorFactory, PdfAdapter, PlainTextAdapter,
};

use crate::helpers::fixtures;

#[tokio::test]
async fn given_text_document_when_loading_then_delegates_to_text_adapter() {
    let pdf_adapter: Arc<dyn FileLoader> = Arc::new(PdfAdapter::new());
    let text_adapter: Arc<dyn FileLoader> = Arc::new(PlainTextAdapter);
    let loader = CompositeFileLoader::new(vec![
        (ContentType::Pdf, pdf_adapter),
        (ContentType::Text, text_adapter),
    ]);

    let data = b"Hello plain text";
    let document = Document::new("readme.txt", FileType::Txt, data.len() as u64);

    let result = loader.extract_text(data, &document).await;

    assert_eq!(result.unwrap(), "Hello plain text");
}

#[tokio::test]
async fn given_unregistered_content_type_when_loading_then_returns_unsupported() {
    let text_adapter: Arc<dyn FileLoader> = Arc::new(PlainTextAdapter);
    let loader = CompositeFileLoader::new(vec![(ContentType::Text, text_adapter)]);

    let data = b"not really a deck";
    let document = Document::new("deck.pptx", FileType::Pptx, data.len() as u64);

    let result = loader.extract_text(data, &document).await;

    assert!(matches!(
        result,
        Err(FileLoaderError::UnsupportedContentType(_))
    ));
}

#[tokio::test]
async fn given_factory_loader_when_loading_legacy_doc_name_then_parses_as_ooxml() {
    let loader = ExtractorFactory::create();
    let data = fixtures::docx(&fixtures::word_paragraph("Legacy name"));
    let document = Document::new("old.doc", FileType::Doc, data.len() as u64);

    let text = loader.extract_text(&data, &document).await.unwrap();

    assert_eq!(text, "Legacy name");
}
