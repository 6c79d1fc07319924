use std::fmt::Display;

use chrono::SecondsFormat;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::application::ports::FormatError;
use crate::domain::{ExtractedDocument, Metadata, OutputFormat};

const RULE_WIDTH: usize = 80;

/// Serializes extracted documents into textual representations.
pub struct OutputFormatter;

#[derive(Serialize)]
struct JsonDocument<'a> {
    file_name: &'a str,
    file_type: &'a str,
    file_size: u64,
    processed_at: String,
    content: &'a str,
    metadata: &'a Metadata,
}

impl OutputFormatter {
    pub fn parse_format(name: &str) -> Result<OutputFormat, FormatError> {
        OutputFormat::from_name(name).ok_or_else(|| FormatError::UnsupportedFormat {
            name: name.to_string(),
            supported: OutputFormat::ALL
                .iter()
                .map(OutputFormat::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    /// Formats by case-insensitive format name.
    pub fn format_named(document: &ExtractedDocument, name: &str) -> Result<String, FormatError> {
        Self::format(document, Self::parse_format(name)?)
    }

    #[tracing::instrument(skip(document), fields(file_name = %document.file_name))]
    pub fn format(document: &ExtractedDocument, format: OutputFormat) -> Result<String, FormatError> {
        match format {
            OutputFormat::Json => Self::to_json(document),
            OutputFormat::Xml => Self::to_xml(document),
            OutputFormat::Csv => Self::to_csv(document),
            OutputFormat::Txt => Ok(Self::to_txt(document)),
        }
    }

    fn to_json(document: &ExtractedDocument) -> Result<String, FormatError> {
        let body = JsonDocument {
            file_name: &document.file_name,
            file_type: document.file_type.extension(),
            file_size: document.size_bytes,
            processed_at: processed_at(document),
            content: &document.content,
            metadata: &document.metadata,
        };
        serde_json::to_string_pretty(&body).map_err(serialization_error)
    }

    fn to_xml(document: &ExtractedDocument) -> Result<String, FormatError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(serialization_error)?;
        writer
            .write_event(Event::Start(BytesStart::new("document")))
            .map_err(serialization_error)?;

        let size = document.size_bytes.to_string();
        let processed_at = processed_at(document);
        let mut file_info = BytesStart::new("file_info");
        file_info.push_attribute(("name", document.file_name.as_str()));
        file_info.push_attribute(("type", document.file_type.extension()));
        file_info.push_attribute(("size", size.as_str()));
        file_info.push_attribute(("processed_at", processed_at.as_str()));
        writer
            .write_event(Event::Empty(file_info))
            .map_err(serialization_error)?;

        write_text_element(&mut writer, "content", &document.content)?;
        write_map_element(&mut writer, "metadata", &document.metadata)?;

        writer
            .write_event(Event::End(BytesEnd::new("document")))
            .map_err(serialization_error)?;

        String::from_utf8(writer.into_inner()).map_err(serialization_error)
    }

    fn to_csv(document: &ExtractedDocument) -> Result<String, FormatError> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .terminator(csv::Terminator::CRLF)
            .from_writer(Vec::new());

        let size = document.size_bytes.to_string();
        let processed_at = processed_at(document);
        let empty: [&str; 0] = [];

        let mut rows: Vec<Vec<String>> = vec![
            row(&["Campo", "Valor"]),
            row(&["Nome do Arquivo", &document.file_name]),
            row(&["Tipo do Arquivo", document.file_type.extension()]),
            row(&["Tamanho (bytes)", &size]),
            row(&["Processado em", &processed_at]),
            row(&empty),
            row(&["Conteúdo"]),
        ];
        rows.extend(document.content.split('\n').map(|line| row(&[line])));
        rows.push(row(&empty));
        rows.push(row(&["Metadados"]));
        rows.extend(
            document
                .metadata
                .iter()
                .map(|(key, value)| vec![key.clone(), inline_value(value)]),
        );

        for record in &rows {
            writer.write_record(record).map_err(serialization_error)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| FormatError::Serialization(e.to_string()))?;
        String::from_utf8(bytes).map_err(serialization_error)
    }

    fn to_txt(document: &ExtractedDocument) -> String {
        let heavy = "=".repeat(RULE_WIDTH);
        let light = "-".repeat(RULE_WIDTH);

        let mut lines = vec![
            heavy.clone(),
            "DOCUMENTO PROCESSADO".to_string(),
            heavy,
            String::new(),
            format!("Nome do Arquivo: {}", document.file_name),
            format!("Tipo do Arquivo: {}", document.file_type),
            format!(
                "Tamanho: {} bytes ({:.2} MB)",
                document.size_bytes,
                document.size_mb()
            ),
            format!("Processado em: {}", processed_at(document)),
            String::new(),
            light.clone(),
            "CONTEÚDO".to_string(),
            light.clone(),
            String::new(),
            document.content.clone(),
            String::new(),
            light.clone(),
            "METADADOS".to_string(),
            light,
            String::new(),
        ];

        for (key, value) in &document.metadata {
            match value {
                Value::Object(entries) => {
                    lines.push(format!("{key}:"));
                    lines.extend(
                        entries
                            .iter()
                            .map(|(sub_key, sub_value)| format!("  {sub_key}: {}", inline_value(sub_value))),
                    );
                }
                other => lines.push(format!("{key}: {}", inline_value(other))),
            }
        }

        lines.join("\n")
    }
}

fn processed_at(document: &ExtractedDocument) -> String {
    document
        .processed_at
        .to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn row(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| f.to_string()).collect()
}

fn serialization_error(e: impl Display) -> FormatError {
    FormatError::Serialization(e.to_string())
}

/// Single-line rendering: scalars as plain text, containers as compact JSON.
fn inline_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Metadata keys are free-form; element names are not.
fn xml_name(key: &str) -> String {
    let mut name: String = key
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let starts_valid = name
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    if !starts_valid {
        name.insert(0, '_');
    }
    name
}

fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    text: &str,
) -> Result<(), FormatError> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(serialization_error)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(serialization_error)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(serialization_error)
}

fn write_map_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    entries: &Map<String, Value>,
) -> Result<(), FormatError> {
    if entries.is_empty() {
        return writer
            .write_event(Event::Empty(BytesStart::new(name)))
            .map_err(serialization_error);
    }

    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(serialization_error)?;
    for (key, value) in entries {
        write_value(writer, &xml_name(key), value)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(serialization_error)
}

/// Mappings become nested elements and sequences become repeated siblings.
fn write_value(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    value: &Value,
) -> Result<(), FormatError> {
    match value {
        Value::Object(entries) => write_map_element(writer, name, entries),
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::Object(entries) => write_map_element(writer, name, entries)?,
                    other => write_text_element(writer, name, &inline_value(other))?,
                }
            }
            Ok(())
        }
        other => write_text_element(writer, name, &inline_value(other)),
    }
}
