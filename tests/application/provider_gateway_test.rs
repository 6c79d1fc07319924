use std::sync::Arc;

use docpipe::application::ports::{LlmClientError, ProviderFactory};
use docpipe::application::services::{ProviderGateway, ProviderRegistry};
use docpipe::domain::{ErrorKind, ProviderKind};

use crate::helpers::stub_provider::{StubFactory, stub_gateway};

#[test]
fn given_gateway_when_listing_providers_then_returns_fixed_order() {
    assert_eq!(
        ProviderGateway::available_providers(),
        vec!["openai", "anthropic", "ollama", "bedrock"]
    );
}

#[test]
fn given_template_with_placeholder_when_building_prompt_then_substitutes_content() {
    let prompt = ProviderGateway::build_prompt("XYZ", Some("Summarize: {content}"));

    assert_eq!(prompt, "Summarize: XYZ");
}

#[test]
fn given_template_without_placeholder_when_building_prompt_then_appends_labelled_content() {
    let prompt = ProviderGateway::build_prompt("XYZ", Some("Summarize"));

    assert_eq!(prompt, "Summarize\n\nDocumento:\nXYZ");
}

#[test]
fn given_no_template_when_building_prompt_then_uses_default_instruction() {
    let expected =
        "Analise o seguinte documento e forneça um resumo detalhado:\n\nXYZ".to_string();

    assert_eq!(ProviderGateway::build_prompt("XYZ", None), expected);
    assert_eq!(ProviderGateway::build_prompt("XYZ", Some("")), expected);
}

#[tokio::test]
async fn given_mixed_case_name_when_invoking_then_forwards_built_prompt() {
    let (factory, gateway) = stub_gateway("ok");

    let reply = gateway
        .invoke("XYZ", "OpenAI", "gpt-4", Some("Summarize: {content}"), Some(50))
        .await
        .unwrap();

    assert_eq!(reply, "ok");
    let request = factory.last_request().unwrap();
    assert_eq!(request.prompt, "Summarize: XYZ");
    assert_eq!(request.model_id, "gpt-4");
    assert_eq!(request.max_tokens, Some(50));
}

#[tokio::test]
async fn given_unknown_provider_when_invoking_then_lists_available_names() {
    let (factory, gateway) = stub_gateway("ok");

    let err = gateway
        .invoke("XYZ", "mistral", "m", None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, LlmClientError::UnsupportedProvider { .. }));
    assert_eq!(err.kind(), ErrorKind::UnsupportedProvider);
    assert!(err.to_string().contains("openai, anthropic, ollama, bedrock"));
    assert_eq!(factory.created(), 0);
}

#[tokio::test]
async fn given_repeated_calls_when_resolving_then_constructs_provider_once() {
    let (factory, gateway) = stub_gateway("ok");

    gateway.invoke("a", "ollama", "llama2", None, None).await.unwrap();
    gateway.invoke("b", "OLLAMA", "llama2", None, None).await.unwrap();

    assert_eq!(factory.created(), 1);
}

#[tokio::test]
async fn given_concurrent_resolution_when_racing_then_registry_keeps_one_instance() {
    let factory = Arc::new(StubFactory::new("ok"));
    let registry = Arc::new(ProviderRegistry::new());
    let gateway = Arc::new(ProviderGateway::new(
        Arc::clone(&factory) as Arc<dyn ProviderFactory>,
        Arc::clone(&registry),
    ));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let gateway = Arc::clone(&gateway);
            tokio::spawn(async move { gateway.resolve("anthropic").map(|_| ()) })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(registry.len(), 1);
    let first = registry.get(ProviderKind::Anthropic).unwrap();
    let again = gateway.resolve("anthropic").unwrap();
    assert!(Arc::ptr_eq(&first, &again));
}

#[tokio::test]
async fn given_provider_when_listing_models_then_returns_its_models() {
    let (_factory, gateway) = stub_gateway("ok");

    let models = gateway.list_models("bedrock").await.unwrap();

    assert_eq!(models, vec!["stub-model".to_string()]);
}
