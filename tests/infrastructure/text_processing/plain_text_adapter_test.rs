use docpipe::application::ports::{FileLoader, FileLoaderError};
use docpipe::domain::{Document, FileType};
use docpipe::infrastructure::text_processing::PlainTextAdapter;

fn text_document(data: &[u8]) -> Document {
    Document::new("notes.txt", FileType::Txt, data.len() as u64)
}

#[tokio::test]
async fn given_utf8_bytes_when_extracting_then_returns_text_unchanged() {
    let data = "Relatório anual\nsegunda linha".as_bytes();

    let text = PlainTextAdapter
        .extract_text(data, &text_document(data))
        .await
        .unwrap();

    assert_eq!(text, "Relatório anual\nsegunda linha");
}

#[tokio::test]
async fn given_latin1_bytes_when_extracting_then_falls_back_to_latin1() {
    let data = b"Ol\xe1 mundo";

    let text = PlainTextAdapter
        .extract_text(data, &text_document(data))
        .await
        .unwrap();

    assert_eq!(text, "Olá mundo");
}

#[test]
fn given_c1_control_bytes_when_decoding_then_latin1_keeps_their_code_points() {
    let text = PlainTextAdapter::decode(b"caf\xe9 \x81").unwrap();

    assert_eq!(text, "café \u{81}");
}

#[test]
fn given_windows_1252_quote_bytes_when_decoding_then_latin1_wins_over_cp1252() {
    let text = PlainTextAdapter::decode(b"\x93quoted\x94 \x80").unwrap();

    assert_eq!(text, "\u{93}quoted\u{94} \u{80}");
}

#[test]
fn given_every_byte_value_when_decoding_then_never_fails() {
    let data: Vec<u8> = (0..=255).collect();

    let text = PlainTextAdapter::decode(&data).unwrap();

    assert_eq!(text.chars().count(), 256);
    assert!(text.chars().zip(0u32..).all(|(c, code)| c as u32 == code));
}

#[tokio::test]
async fn given_non_text_document_when_extracting_then_returns_unsupported_content_type() {
    let document = Document::new("a.pdf", FileType::Pdf, 3);

    let result = PlainTextAdapter.extract_text(b"abc", &document).await;

    assert!(matches!(
        result,
        Err(FileLoaderError::UnsupportedContentType(_))
    ));
}

#[tokio::test]
async fn given_text_document_when_extracting_metadata_then_returns_no_keys() {
    let data = b"hello";

    let metadata = PlainTextAdapter
        .extract_metadata(data, &text_document(data))
        .await
        .unwrap();

    assert!(metadata.is_empty());
}
