use docpipe::domain::BatchDestination;

#[test]
fn given_prefix_when_naming_object_then_joins_with_slash() {
    let destination = BatchDestination {
        prefix: Some("reports/2024".to_string()),
        ..BatchDestination::default()
    };

    assert_eq!(destination.object_name("a.json"), "reports/2024/a.json");
}

#[test]
fn given_empty_prefix_when_naming_object_then_uses_bare_name() {
    let destination = BatchDestination {
        prefix: Some(String::new()),
        ..BatchDestination::default()
    };

    assert_eq!(destination.object_name("a.json"), "a.json");
}
