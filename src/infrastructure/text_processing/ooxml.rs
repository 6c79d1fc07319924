use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use zip::ZipArchive;
use zip::result::ZipError;

use crate::application::ports::FileLoaderError;

pub(super) type Archive<'a> = ZipArchive<Cursor<&'a [u8]>>;

pub(super) fn open_archive(data: &[u8]) -> Result<Archive<'_>, FileLoaderError> {
    ZipArchive::new(Cursor::new(data)).map_err(|e| {
        FileLoaderError::ExtractionFailed(format!("not an Office Open XML package: {e}"))
    })
}

/// Reads a package part as UTF-8. Returns `None` when the part does not exist.
pub(super) fn read_part(
    archive: &mut Archive<'_>,
    name: &str,
) -> Result<Option<String>, FileLoaderError> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => {
            return Err(FileLoaderError::ExtractionFailed(format!(
                "failed to open {name}: {e}"
            )));
        }
    };

    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| FileLoaderError::ExtractionFailed(format!("failed to read {name}: {e}")))?;
    Ok(Some(xml))
}

pub(super) fn require_part(
    archive: &mut Archive<'_>,
    name: &str,
) -> Result<String, FileLoaderError> {
    read_part(archive, name)?
        .ok_or_else(|| FileLoaderError::ExtractionFailed(format!("missing package part {name}")))
}

pub(super) fn xml_error(part: &str, e: impl std::fmt::Display) -> FileLoaderError {
    FileLoaderError::ExtractionFailed(format!("malformed XML in {part}: {e}"))
}

/// Value of the attribute with local name `local`. `prefixed` selects a
/// namespaced key such as `r:id` over a plain `id`.
pub(super) fn attribute_value(
    element: &BytesStart<'_>,
    part: &str,
    local: &[u8],
    prefixed: bool,
) -> Result<Option<String>, FileLoaderError> {
    for attribute in element.attributes() {
        let attribute = attribute.map_err(|e| xml_error(part, e))?;
        if attribute.key.local_name().as_ref() == local
            && attribute.key.prefix().is_some() == prefixed
        {
            let value = attribute.unescape_value().map_err(|e| xml_error(part, e))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Text content of the Dublin Core properties in `docProps/core.xml`, keyed
/// by local element name. Only non-empty values are returned.
pub(super) fn core_properties(xml: &str) -> Result<Vec<(String, String)>, FileLoaderError> {
    let mut reader = Reader::from_str(xml);
    let mut properties = Vec::new();
    let mut current: Option<(String, String)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                current = Some((name, String::new()));
            }
            Ok(Event::Text(t)) => {
                if let Some((_, value)) = current.as_mut() {
                    let text = t.unescape().map_err(|e| xml_error("docProps/core.xml", e))?;
                    value.push_str(&text);
                }
            }
            Ok(Event::End(_)) => {
                if let Some((name, value)) = current.take() {
                    let value = value.trim().to_string();
                    if !value.is_empty() {
                        properties.push((name, value));
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(xml_error("docProps/core.xml", e)),
        }
    }

    Ok(properties)
}
