use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde_json::{Map, Value};

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{ContentType, Document, Metadata};

use super::ooxml;

const DOCUMENT_PART: &str = "word/document.xml";
const CORE_PART: &str = "docProps/core.xml";

/// Word-processing documents. Legacy `.doc` files are attempted as OOXML too
/// and fail with an extraction error when they are not zip packages.
pub struct DocxAdapter;

/// Body structure of `word/document.xml`.
#[derive(Debug, Default)]
struct DocxBody {
    /// Every top-level paragraph, including empty ones.
    paragraphs: Vec<String>,
    /// Top-level tables as rows of trimmed cell texts.
    tables: Vec<Vec<Vec<String>>>,
}

impl DocxBody {
    fn render(&self) -> String {
        let mut parts: Vec<String> = self
            .paragraphs
            .iter()
            .filter(|p| !p.trim().is_empty())
            .cloned()
            .collect();

        for table in &self.tables {
            let rows: Vec<String> = table.iter().map(|row| row.join(" | ")).collect();
            if !rows.is_empty() {
                parts.push(rows.join("\n"));
            }
        }

        parts.join("\n\n")
    }
}

#[derive(Default)]
struct BodyParser {
    body: DocxBody,
    table_depth: usize,
    paragraph_depth: usize,
    run_depth: usize,
    in_text: bool,
    paragraph: String,
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: Vec<String>,
}

impl BodyParser {
    /// Paragraphs are only recorded at the outermost paragraph level of the
    /// body or of a top-level table cell.
    fn collecting(&self) -> bool {
        self.paragraph_depth == 1 && self.table_depth <= 1
    }

    fn on_open(&mut self, e: &BytesStart<'_>, is_empty: bool) {
        match e.local_name().as_ref() {
            b"p" => {
                if is_empty {
                    if self.paragraph_depth == 0 {
                        self.finish_paragraph(String::new());
                    }
                    return;
                }
                self.paragraph_depth += 1;
                if self.paragraph_depth == 1 {
                    self.paragraph.clear();
                }
            }
            b"r" if !is_empty => self.run_depth += 1,
            b"t" if !is_empty && self.run_depth > 0 => self.in_text = true,
            b"tab" if self.run_depth > 0 && self.collecting() => self.paragraph.push('\t'),
            b"br" | b"cr" if self.run_depth > 0 && self.collecting() => {
                self.paragraph.push('\n')
            }
            b"tbl" if !is_empty => {
                self.table_depth += 1;
                if self.table_depth == 1 {
                    self.rows.clear();
                }
            }
            b"tr" if !is_empty && self.table_depth == 1 => self.row.clear(),
            b"tc" if !is_empty && self.table_depth == 1 => self.cell.clear(),
            _ => {}
        }
    }

    fn on_close(&mut self, local_name: &[u8]) {
        match local_name {
            b"p" => {
                if self.paragraph_depth == 1 {
                    let text = std::mem::take(&mut self.paragraph);
                    self.finish_paragraph(text);
                }
                self.paragraph_depth = self.paragraph_depth.saturating_sub(1);
            }
            b"r" => self.run_depth = self.run_depth.saturating_sub(1),
            b"t" => self.in_text = false,
            b"tc" if self.table_depth == 1 => {
                let text = self.cell.join("\n").trim().to_string();
                self.row.push(text);
            }
            b"tr" if self.table_depth == 1 => {
                let row = std::mem::take(&mut self.row);
                self.rows.push(row);
            }
            b"tbl" => {
                if self.table_depth == 1 {
                    let rows = std::mem::take(&mut self.rows);
                    self.body.tables.push(rows);
                }
                self.table_depth = self.table_depth.saturating_sub(1);
            }
            _ => {}
        }
    }

    fn finish_paragraph(&mut self, text: String) {
        match self.table_depth {
            0 => self.body.paragraphs.push(text),
            1 => self.cell.push(text),
            _ => {}
        }
    }

    fn on_text(&mut self, text: &str) {
        if self.in_text && self.collecting() {
            self.paragraph.push_str(text);
        }
    }
}

impl DocxAdapter {
    fn parse_body(data: &[u8]) -> Result<DocxBody, FileLoaderError> {
        let mut archive = ooxml::open_archive(data)?;
        let xml = ooxml::require_part(&mut archive, DOCUMENT_PART)?;

        let mut reader = Reader::from_str(&xml);
        let mut parser = BodyParser::default();

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => parser.on_open(&e, false),
                Ok(Event::Empty(e)) => parser.on_open(&e, true),
                Ok(Event::End(e)) => parser.on_close(e.local_name().as_ref()),
                Ok(Event::Text(t)) => {
                    let text = t.unescape().map_err(|e| ooxml::xml_error(DOCUMENT_PART, e))?;
                    parser.on_text(&text);
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(ooxml::xml_error(DOCUMENT_PART, e)),
            }
        }

        Ok(parser.body)
    }

    fn read_metadata(data: &[u8]) -> Result<Metadata, FileLoaderError> {
        let body = Self::parse_body(data)?;
        let mut metadata = Metadata::new();
        metadata.insert(
            "num_paragraphs".to_string(),
            Value::from(body.paragraphs.len()),
        );
        metadata.insert("num_tables".to_string(), Value::from(body.tables.len()));

        let mut archive = ooxml::open_archive(data)?;
        if let Some(xml) = ooxml::read_part(&mut archive, CORE_PART)? {
            let mut properties = Map::new();
            for (name, value) in ooxml::core_properties(&xml)? {
                let key = match name.as_str() {
                    "title" => "title",
                    "creator" => "author",
                    "created" => "created",
                    "modified" => "modified",
                    _ => continue,
                };
                properties.insert(key.to_string(), Value::String(value));
            }
            if !properties.is_empty() {
                metadata.insert("docx_metadata".to_string(), Value::Object(properties));
            }
        }

        Ok(metadata)
    }
}

fn ensure_word_processing(document: &Document) -> Result<(), FileLoaderError> {
    if document.file_type.content_type() != ContentType::WordProcessing {
        return Err(FileLoaderError::UnsupportedContentType(
            document.file_type.to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl FileLoader for DocxAdapter {
    #[tracing::instrument(skip(self, data), fields(filename = %document.filename))]
    async fn extract_text(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<String, FileLoaderError> {
        ensure_word_processing(document)?;

        let body = Self::parse_body(data)?;
        tracing::debug!(
            paragraphs = body.paragraphs.len(),
            tables = body.tables.len(),
            "Word document parsed"
        );
        Ok(body.render())
    }

    async fn extract_metadata(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<Metadata, FileLoaderError> {
        ensure_word_processing(document)?;
        Self::read_metadata(data)
    }
}
