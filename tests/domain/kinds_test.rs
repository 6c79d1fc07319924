use docpipe::domain::{DestinationKind, ErrorKind, OutputFormat, ProviderKind, SourceKind};

#[test]
fn given_provider_name_in_any_case_when_parsing_then_resolves_kind() {
    assert_eq!(ProviderKind::from_name("OpenAI"), Some(ProviderKind::OpenAi));
    assert_eq!(ProviderKind::from_name(" bedrock "), Some(ProviderKind::Bedrock));
    assert_eq!(ProviderKind::from_name("mistral"), None);
}

#[test]
fn given_provider_catalogue_when_listed_then_order_is_fixed() {
    let names: Vec<&str> = ProviderKind::ALL.iter().map(ProviderKind::as_str).collect();
    assert_eq!(names, vec!["openai", "anthropic", "ollama", "bedrock"]);
}

#[test]
fn given_source_names_when_parsing_then_round_trip_through_as_str() {
    for name in ["upload", "local_path", "network_path", "s3", "azure"] {
        let kind = SourceKind::from_name(name).unwrap();
        assert_eq!(kind.as_str(), name);
    }
}

#[test]
fn given_destination_names_when_parsing_then_unknown_is_rejected() {
    assert_eq!(DestinationKind::from_name("S3"), Some(DestinationKind::S3));
    assert_eq!(DestinationKind::from_name("ftp"), None);
}

#[test]
fn given_format_name_when_parsing_then_case_is_ignored() {
    assert_eq!(OutputFormat::from_name("XML"), Some(OutputFormat::Xml));
    assert_eq!(OutputFormat::from_name("yaml"), None);
}

#[test]
fn given_io_error_kind_when_rendered_then_uses_taxonomy_name() {
    assert_eq!(ErrorKind::IoError.to_string(), "IOError");
    assert_eq!(ErrorKind::DecodeError.to_string(), "DecodeError");
}
