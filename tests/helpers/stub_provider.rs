use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use docpipe::application::ports::{GenerationProvider, LlmClientError, ProviderFactory};
use docpipe::application::services::{ProviderGateway, ProviderRegistry};
use docpipe::domain::{GenerationRequest, ProviderKind};

/// Provider that records every request and answers with a fixed reply.
pub struct StubProvider {
    kind: ProviderKind,
    reply: String,
    pub requests: Mutex<Vec<GenerationRequest>>,
}

#[async_trait]
impl GenerationProvider for StubProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn generate_response(
        &self,
        request: &GenerationRequest,
    ) -> Result<String, LlmClientError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.reply.clone())
    }

    fn available_models(&self) -> Vec<String> {
        vec!["stub-model".to_string()]
    }
}

pub struct StubFactory {
    reply: String,
    pub created: AtomicUsize,
    pub providers: Mutex<Vec<Arc<StubProvider>>>,
}

impl StubFactory {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            created: AtomicUsize::new(0),
            providers: Mutex::new(Vec::new()),
        }
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        let providers = self.providers.lock().unwrap();
        providers
            .iter()
            .flat_map(|p| p.requests.lock().unwrap().clone())
            .last()
            .map(|r| r.prompt)
    }

    pub fn last_request(&self) -> Option<GenerationRequest> {
        let providers = self.providers.lock().unwrap();
        providers
            .iter()
            .flat_map(|p| p.requests.lock().unwrap().clone())
            .last()
    }
}

impl ProviderFactory for StubFactory {
    fn create(&self, kind: ProviderKind) -> Result<Arc<dyn GenerationProvider>, LlmClientError> {
        self.created.fetch_add(1, Ordering::SeqCst);
        let provider = Arc::new(StubProvider {
            kind,
            reply: self.reply.clone(),
            requests: Mutex::new(Vec::new()),
        });
        self.providers.lock().unwrap().push(Arc::clone(&provider));
        Ok(provider)
    }
}

pub fn stub_gateway(reply: &str) -> (Arc<StubFactory>, ProviderGateway) {
    let factory = Arc::new(StubFactory::new(reply));
    let gateway = ProviderGateway::new(
        Arc::clone(&factory) as Arc<dyn ProviderFactory>,
        Arc::new(ProviderRegistry::new()),
    );
    (factory, gateway)
}
