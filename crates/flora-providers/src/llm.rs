//! OpenAI-compatible chat-completion backend.
//!
//! Routes the platform's natural-language query assistance through any
//! OpenAI-compatible `/chat/completions` endpoint.  The conversation is
//! always two messages: a persona-specific system prompt and the user's
//! query.  What the model answers is returned verbatim — turning that
//! answer into occurrence-search parameters is the caller's concern.

use crate::config::LlmConfig;
use async_trait::async_trait;
use flora_kernel::service::{
    ServiceCapability, ServiceError, ServiceProvider, ServiceResult, UserType,
};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::time::Duration;
use tracing::{debug, instrument};

/// Service id under which the provider registers.
pub const LLM_SERVICE_ID: &str = "openai";

/// Upstream completion body, reduced to the fields the platform consumes.
#[derive(Debug, Deserialize)]
struct CompletionBody {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
    #[serde(default)]
    usage: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Proxies query-assistance requests to an OpenAI-compatible REST API.
pub struct OpenAiProvider {
    config: LlmConfig,
    client: Client,
}

impl OpenAiProvider {
    /// Provider with an explicit configuration.
    pub fn new(config: LlmConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to build reqwest client");
        Self { config, client }
    }

    /// Provider configured from the `LLM_*` environment variables.
    pub fn from_env() -> Self {
        Self::new(LlmConfig::from_env())
    }

    /// Run one chat completion over the caller's query.
    #[instrument(skip(self, parameters), fields(model = %self.config.model))]
    async fn translate_query(&self, parameters: &Map<String, Value>) -> ServiceResult<Value> {
        let query = parameters
            .get("query")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ServiceError::InvalidParameters("query translation requires a 'query'".to_string())
            })?;
        let user_type = parameters
            .get("userType")
            .and_then(|v| serde_json::from_value::<UserType>(v.clone()).ok())
            .unwrap_or_default();

        let url = format!("{}/chat/completions", self.config.endpoint);
        debug!(url = %url, user_type = user_type.as_str(), "requesting chat completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&completion_request(&self.config.model, user_type, query))
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ServiceError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let body: CompletionBody = response
            .json()
            .await
            .map_err(|e| ServiceError::InvalidResponse(e.to_string()))?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default();

        Ok(json!({
            "response": content,
            "usage": body.usage,
        }))
    }
}

#[async_trait]
impl ServiceProvider for OpenAiProvider {
    fn id(&self) -> &str {
        LLM_SERVICE_ID
    }

    fn name(&self) -> &str {
        "OpenAI-Compatible Language Model"
    }

    fn base_url(&self) -> Option<&str> {
        Some(&self.config.endpoint)
    }

    fn capabilities(&self) -> Vec<ServiceCapability> {
        vec![
            ServiceCapability::new("query_translation", "Query Translation", "1.0.0")
                .with_description(
                    "Help a user turn a natural-language question into GBIF occurrence \
                     search parameters",
                )
                .with_input_schema(json!({
                    "type": "object",
                    "required": ["query"],
                    "properties": {
                        "query": {"type": "string"},
                        "userType": {"type": "string", "enum": ["citizen", "researcher"]}
                    }
                }))
                .with_output_schema(json!({
                    "type": "object",
                    "properties": {
                        "response": {"type": "string"},
                        "usage": {"type": "object"}
                    }
                })),
        ]
    }

    async fn invoke(
        &self,
        capability_id: &str,
        parameters: &Map<String, Value>,
    ) -> ServiceResult<Value> {
        match capability_id {
            "query_translation" => self.translate_query(parameters).await,
            other => Err(ServiceError::UnsupportedCapability {
                service: LLM_SERVICE_ID.to_string(),
                capability: other.to_string(),
            }),
        }
    }
}

/// The system prompt pitched at the given persona.
fn system_prompt(user_type: UserType) -> String {
    format!(
        "You are an AI assistant for a biodiversity platform called \"Faces of Plants\" \
         powered by GBIF data. The user is a {}. Help them construct appropriate GBIF API \
         queries based on their natural language input.",
        user_type.as_str()
    )
}

/// The completion request body: the configured model plus a two-message
/// conversation.
fn completion_request(model: &str, user_type: UserType, query: &str) -> Value {
    json!({
        "model": model,
        "messages": [
            {"role": "system", "content": system_prompt(user_type)},
            {"role": "user", "content": query},
        ],
    })
}
