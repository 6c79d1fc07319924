use std::collections::HashMap;

use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde_json::Value;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{ContentType, Document, Metadata};

use super::ooxml::{self, Archive};

const PRESENTATION_PART: &str = "ppt/presentation.xml";
const PRESENTATION_RELS: &str = "ppt/_rels/presentation.xml.rels";
const SLIDE_PREFIX: &str = "ppt/slides/slide";
const SLIDE_SUFFIX: &str = ".xml";

/// Presentations. Slides are read in `<p:sldIdLst>` order; packages without
/// `ppt/presentation.xml` fall back to the numeric order of their part names.
pub struct PptxAdapter;

#[derive(Default)]
struct SlideParser {
    shapes: Vec<String>,
    group_depth: usize,
    in_shape: bool,
    in_text: bool,
    paragraphs: Vec<String>,
    paragraph: Option<String>,
}

impl SlideParser {
    fn on_open(&mut self, e: &BytesStart<'_>, is_empty: bool) {
        match e.local_name().as_ref() {
            b"grpSp" if !is_empty => self.group_depth += 1,
            b"sp" if !is_empty && self.group_depth == 0 => {
                self.in_shape = true;
                self.paragraphs.clear();
            }
            b"p" if self.in_shape => {
                if is_empty {
                    self.paragraphs.push(String::new());
                } else {
                    self.paragraph = Some(String::new());
                }
            }
            b"t" if !is_empty && self.in_shape => self.in_text = true,
            b"br" if self.in_shape => {
                if let Some(paragraph) = self.paragraph.as_mut() {
                    paragraph.push('\n');
                }
            }
            _ => {}
        }
    }

    fn on_close(&mut self, local_name: &[u8]) {
        match local_name {
            b"grpSp" => self.group_depth = self.group_depth.saturating_sub(1),
            b"sp" if self.in_shape && self.group_depth == 0 => {
                self.in_shape = false;
                let text = std::mem::take(&mut self.paragraphs).join("\n");
                if !text.trim().is_empty() {
                    self.shapes.push(text);
                }
            }
            b"p" if self.in_shape => {
                if let Some(paragraph) = self.paragraph.take() {
                    self.paragraphs.push(paragraph);
                }
            }
            b"t" => self.in_text = false,
            _ => {}
        }
    }

    fn on_text(&mut self, text: &str) {
        if self.in_text {
            if let Some(paragraph) = self.paragraph.as_mut() {
                paragraph.push_str(text);
            }
        }
    }
}

impl PptxAdapter {
    fn slide_parts(archive: &mut Archive<'_>) -> Result<Vec<String>, FileLoaderError> {
        let Some(presentation) = ooxml::read_part(archive, PRESENTATION_PART)? else {
            return Ok(Self::numbered_slide_parts(archive));
        };
        let Some(rels) = ooxml::read_part(archive, PRESENTATION_RELS)? else {
            tracing::warn!("Presentation has no relationships part, using part-name order");
            return Ok(Self::numbered_slide_parts(archive));
        };

        let targets = relationship_targets(&rels)?;
        let parts = slide_relationship_ids(&presentation)?
            .into_iter()
            .filter_map(|id| {
                let part = targets.get(&id).cloned();
                if part.is_none() {
                    tracing::warn!(relationship = %id, "Slide relationship not found");
                }
                part
            })
            .collect();
        Ok(parts)
    }

    fn numbered_slide_parts(archive: &Archive<'_>) -> Vec<String> {
        let mut slides: Vec<(u32, String)> = archive
            .file_names()
            .filter_map(|name| {
                let number = name
                    .strip_prefix(SLIDE_PREFIX)?
                    .strip_suffix(SLIDE_SUFFIX)?
                    .parse::<u32>()
                    .ok()?;
                Some((number, name.to_string()))
            })
            .collect();
        slides.sort_by_key(|(number, _)| *number);
        slides.into_iter().map(|(_, name)| name).collect()
    }

    fn shape_texts(part: &str, xml: &str) -> Result<Vec<String>, FileLoaderError> {
        let mut reader = Reader::from_str(xml);
        let mut parser = SlideParser::default();

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => parser.on_open(&e, false),
                Ok(Event::Empty(e)) => parser.on_open(&e, true),
                Ok(Event::End(e)) => parser.on_close(e.local_name().as_ref()),
                Ok(Event::Text(t)) => {
                    let text = t.unescape().map_err(|e| ooxml::xml_error(part, e))?;
                    parser.on_text(&text);
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(ooxml::xml_error(part, e)),
            }
        }

        Ok(parser.shapes)
    }

    fn read_slides(data: &[u8]) -> Result<Vec<Vec<String>>, FileLoaderError> {
        let mut archive = ooxml::open_archive(data)?;
        let parts = Self::slide_parts(&mut archive)?;

        let mut slides = Vec::with_capacity(parts.len());
        for part in parts {
            let xml = ooxml::require_part(&mut archive, &part)?;
            slides.push(Self::shape_texts(&part, &xml)?);
        }
        Ok(slides)
    }
}

/// `r:id` of every `<p:sldId>` in presentation order.
fn slide_relationship_ids(xml: &str) -> Result<Vec<String>, FileLoaderError> {
    let mut reader = Reader::from_str(xml);
    let mut ids = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.local_name().as_ref() == b"sldId" => {
                if let Some(id) = ooxml::attribute_value(&e, PRESENTATION_PART, b"id", true)? {
                    ids.push(id);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(ooxml::xml_error(PRESENTATION_PART, e)),
        }
    }

    Ok(ids)
}

/// Relationship id to package part name.
fn relationship_targets(xml: &str) -> Result<HashMap<String, String>, FileLoaderError> {
    let mut reader = Reader::from_str(xml);
    let mut targets = HashMap::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let id = ooxml::attribute_value(&e, PRESENTATION_RELS, b"Id", false)?;
                let target = ooxml::attribute_value(&e, PRESENTATION_RELS, b"Target", false)?;
                if let (Some(id), Some(target)) = (id, target) {
                    targets.insert(id, resolve_target(&target));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(ooxml::xml_error(PRESENTATION_RELS, e)),
        }
    }

    Ok(targets)
}

/// Targets are relative to `ppt/` unless they start at the package root.
fn resolve_target(target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments = vec!["ppt"];
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

fn ensure_presentation(document: &Document) -> Result<(), FileLoaderError> {
    if document.file_type.content_type() != ContentType::Presentation {
        return Err(FileLoaderError::UnsupportedContentType(
            document.file_type.to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl FileLoader for PptxAdapter {
    #[tracing::instrument(skip(self, data), fields(filename = %document.filename))]
    async fn extract_text(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<String, FileLoaderError> {
        ensure_presentation(document)?;

        let slides = Self::read_slides(data)?;
        tracing::debug!(slide_count = slides.len(), "Presentation parsed");

        Ok(slides
            .into_iter()
            .enumerate()
            .filter(|(_, shapes)| !shapes.is_empty())
            .map(|(index, shapes)| format!("--- Slide {} ---\n{}", index + 1, shapes.join("\n")))
            .collect::<Vec<_>>()
            .join("\n\n"))
    }

    async fn extract_metadata(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<Metadata, FileLoaderError> {
        ensure_presentation(document)?;

        let mut archive = ooxml::open_archive(data)?;
        let mut metadata = Metadata::new();
        metadata.insert(
            "num_slides".to_string(),
            Value::from(Self::slide_parts(&mut archive)?.len()),
        );
        Ok(metadata)
    }
}
