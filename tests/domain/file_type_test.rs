use docpipe::domain::{ContentType, FileType, extension_of};

#[test]
fn given_mixed_case_name_when_deriving_extension_then_lowercases_final_segment() {
    assert_eq!(extension_of("Report.Final.PDF"), ".pdf");
}

#[test]
fn given_name_without_dot_when_deriving_extension_then_uses_whole_name() {
    assert_eq!(extension_of("README"), ".readme");
}

#[test]
fn given_supported_name_when_resolving_file_type_then_returns_type() {
    assert_eq!(FileType::from_file_name("deck.PPTX"), Some(FileType::Pptx));
    assert_eq!(FileType::from_file_name("notes.txt"), Some(FileType::Txt));
}

#[test]
fn given_unsupported_name_when_resolving_file_type_then_returns_none() {
    assert_eq!(FileType::from_file_name("sheet.xlsx"), None);
}

#[test]
fn given_legacy_office_types_when_mapping_content_type_then_shares_family_with_ooxml() {
    assert_eq!(FileType::Doc.content_type(), ContentType::WordProcessing);
    assert_eq!(FileType::Docx.content_type(), ContentType::WordProcessing);
    assert_eq!(FileType::Ppt.content_type(), ContentType::Presentation);
}

#[test]
fn given_supported_extensions_when_listed_then_contains_all_six() {
    assert_eq!(
        FileType::supported_extensions(),
        vec![".pdf", ".txt", ".docx", ".doc", ".pptx", ".ppt"]
    );
}
