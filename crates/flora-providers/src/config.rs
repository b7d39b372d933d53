//! Environment-driven provider configuration.

/// Configuration for the chat-completion backend.
///
/// The deployment wires these through `LLM_PROVIDER`, `LLM_API_KEY`,
/// `LLM_ENDPOINT` and `LLM_MODEL`.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Upstream flavour, e.g. `openai`.  Informational — any
    /// OpenAI-compatible endpoint works.
    pub provider: String,
    /// Bearer token sent with every completion request.
    pub api_key: String,
    /// Base URL of the completion API, e.g. `https://api.openai.com/v1`.
    pub endpoint: String,
    /// Model identifier sent in the request body.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            api_key: String::new(),
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 60,
        }
    }
}

impl LlmConfig {
    /// Configuration with an explicit API key and defaults elsewhere.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Read the configuration from the environment, falling back to the
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            config.provider = provider;
        }
        if let Ok(api_key) = std::env::var("LLM_API_KEY") {
            config.api_key = api_key;
        }
        if let Ok(endpoint) = std::env::var("LLM_ENDPOINT") {
            config.endpoint = endpoint.trim_end_matches('/').to_string();
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            config.model = model;
        }
        config
    }

    /// Builder: set the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Builder: set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Builder: set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}
