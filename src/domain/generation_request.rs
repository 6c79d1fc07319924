#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model_id: String,
    pub max_tokens: Option<u32>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model_id: model_id.into(),
            max_tokens: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}
