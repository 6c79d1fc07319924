use chrono::{TimeZone, Utc};
use serde_json::{Value, json};

use docpipe::application::ports::FormatError;
use docpipe::application::services::OutputFormatter;
use docpipe::domain::{ErrorKind, ExtractedDocument, FileType, Metadata, OutputFormat};

fn document(content: &str, metadata: Value) -> ExtractedDocument {
    let Value::Object(metadata) = metadata else {
        panic!("metadata must be an object");
    };
    ExtractedDocument {
        content: content.to_string(),
        metadata,
        file_name: "report.pdf".to_string(),
        size_bytes: 11,
        file_type: FileType::Pdf,
        processed_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
    }
}

fn csv_records(output: &str) -> Vec<Vec<String>> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(output.as_bytes())
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

fn row(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| f.to_string()).collect()
}

#[test]
fn given_document_when_formatting_csv_then_emits_sections_in_order() {
    let doc = document("Hello\nWorld", json!({"num_pages": 1}));

    let output = OutputFormatter::format(&doc, OutputFormat::Csv).unwrap();
    let records = csv_records(&output);

    assert_eq!(records[0], row(&["Campo", "Valor"]));
    assert!(records.contains(&row(&["Nome do Arquivo", "report.pdf"])));
    assert!(records.contains(&row(&["Tipo do Arquivo", ".pdf"])));
    assert!(records.contains(&row(&["Tamanho (bytes)", "11"])));

    let content_at = records.iter().position(|r| *r == row(&["Conteúdo"])).unwrap();
    assert_eq!(records[content_at + 1], row(&["Hello"]));
    assert_eq!(records[content_at + 2], row(&["World"]));

    let metadata_at = records.iter().position(|r| *r == row(&["Metadados"])).unwrap();
    assert_eq!(records[metadata_at + 1], row(&["num_pages", "1"]));
}

#[test]
fn given_nested_metadata_when_formatting_csv_then_value_is_compact_json() {
    let doc = document("x", json!({"pdf_metadata": {"Title": "Q1"}}));

    let output = OutputFormatter::format(&doc, OutputFormat::Csv).unwrap();

    assert!(csv_records(&output).contains(&row(&["pdf_metadata", r#"{"Title":"Q1"}"#])));
}

#[test]
fn given_non_ascii_document_when_formatting_json_then_round_trips_content_and_metadata() {
    let doc = document(
        "Relatório de ações\n— fim",
        json!({"num_pages": 2, "pdf_metadata": {"Author": "João"}, "tags": ["a", "b"]}),
    );

    let output = OutputFormatter::format(&doc, OutputFormat::Json).unwrap();
    let parsed: Value = serde_json::from_str(&output).unwrap();

    assert!(output.contains("Relatório de ações"));
    assert_eq!(parsed["content"], json!(doc.content));
    assert_eq!(parsed["metadata"], Value::Object(doc.metadata.clone()));
    assert_eq!(parsed["file_name"], json!("report.pdf"));
    assert_eq!(parsed["file_type"], json!(".pdf"));
    assert_eq!(parsed["file_size"], json!(11));
    assert!(output.contains("\n  \"content\""));
}

#[test]
fn given_document_when_formatting_xml_then_nests_metadata_elements() {
    let doc = document(
        "Hello & <World>",
        json!({
            "num_pages": 1,
            "pdf_metadata": {"Title": "Q1"},
            "authors": ["Ana", "Rui"],
            "file size": 11
        }),
    );

    let output = OutputFormatter::format(&doc, OutputFormat::Xml).unwrap();

    assert!(output.starts_with("<?xml version=\"1.0\""));
    assert!(output.contains(r#"<file_info name="report.pdf" type=".pdf" size="11""#));
    assert!(output.contains("<content>Hello &amp; &lt;World&gt;</content>"));
    assert!(output.contains("<num_pages>1</num_pages>"));
    assert!(output.contains("<Title>Q1</Title>"));
    assert!(output.contains("<authors>Ana</authors>"));
    assert!(output.contains("<authors>Rui</authors>"));
    assert!(output.contains("<file_size>11</file_size>"));
    assert!(output.contains("\n  <metadata>"));
}

#[test]
fn given_empty_metadata_when_formatting_xml_then_emits_empty_element() {
    let doc = document("x", json!({}));

    let output = OutputFormatter::format(&doc, OutputFormat::Xml).unwrap();

    assert!(output.contains("<metadata/>"));
}

#[test]
fn given_document_when_formatting_txt_then_uses_banner_layout() {
    let doc = document("Hello", json!({"num_pages": 1, "pdf_metadata": {"Title": "Q1"}}));

    let output = OutputFormatter::format(&doc, OutputFormat::Txt).unwrap();
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines[0], "=".repeat(80));
    assert_eq!(lines[1], "DOCUMENTO PROCESSADO");
    assert!(lines.contains(&"Nome do Arquivo: report.pdf"));
    assert!(lines.contains(&"Tamanho: 11 bytes (0.00 MB)"));
    assert!(lines.contains(&"CONTEÚDO"));
    assert!(lines.contains(&"METADADOS"));
    assert!(lines.contains(&"num_pages: 1"));
    assert!(lines.contains(&"pdf_metadata:"));
    assert!(lines.contains(&"  Title: Q1"));
}

#[test]
fn given_unknown_format_name_when_formatting_then_returns_unsupported_format() {
    let doc = document("x", json!({}));

    let err = OutputFormatter::format_named(&doc, "yaml").unwrap_err();

    assert!(matches!(err, FormatError::UnsupportedFormat { .. }));
    assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    assert!(err.to_string().contains("json, xml, csv, txt"));
}

#[test]
fn given_uppercase_format_name_when_formatting_then_accepts_it() {
    let doc = document("x", Value::Object(Metadata::new()));

    assert!(OutputFormatter::format_named(&doc, "JSON").is_ok());
}
