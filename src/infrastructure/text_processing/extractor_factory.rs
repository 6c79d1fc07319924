use std::sync::Arc;

use crate::application::ports::FileLoader;
use crate::domain::ContentType;

use super::{CompositeFileLoader, DocxAdapter, PdfAdapter, PlainTextAdapter, PptxAdapter};

pub struct ExtractorFactory;

impl ExtractorFactory {
    /// Loader covering every supported document family.
    pub fn create() -> Arc<dyn FileLoader> {
        let pdf_adapter: Arc<dyn FileLoader> = Arc::new(PdfAdapter::new());
        let text_adapter: Arc<dyn FileLoader> = Arc::new(PlainTextAdapter);
        let docx_adapter: Arc<dyn FileLoader> = Arc::new(DocxAdapter);
        let pptx_adapter: Arc<dyn FileLoader> = Arc::new(PptxAdapter);

        tracing::debug!("Registering document loaders");
        Arc::new(CompositeFileLoader::new(vec![
            (ContentType::Pdf, pdf_adapter),
            (ContentType::Text, text_adapter),
            (ContentType::WordProcessing, docx_adapter),
            (ContentType::Presentation, pptx_adapter),
        ]))
    }
}
