//! Native Ollama provider.
//!
//! Talks to Ollama's own `/api/chat` endpoint rather than its OpenAI shim,
//! because only the native API accepts a JSON Schema in the `format` field
//! for constrained output.

use async_trait::async_trait;
use carebridge_core::error::GatewayError;
use carebridge_core::message::{Message, Role};
use carebridge_core::provider::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default address of a local Ollama daemon.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// An Ollama LLM provider.
pub struct OllamaProvider {
    base_url: String,
    client: reqwest::Client,
    structured_output: bool,
}

impl OllamaProvider {
    /// Create a provider for the Ollama daemon at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            structured_output: true,
        }
    }

    /// Create a provider for the local daemon.
    pub fn local() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }

    /// Override schema support (older Ollama releases ignore `format` schemas).
    pub fn with_structured_output(mut self, enabled: bool) -> Self {
        self.structured_output = enabled;
        self
    }

    fn build_body(&self, request: &ProviderRequest) -> ChatBody {
        ChatBody {
            model: request.model.clone(),
            messages: request
                .messages
                .iter()
                .map(|m| ApiMessage {
                    role: m.role.as_str().to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            stream: false,
            format: request
                .output_schema
                .clone()
                .filter(|_| self.structured_output),
            options: request.temperature.map(|temperature| ChatOptions { temperature }),
        }
    }
}

#[async_trait]
impl carebridge_core::Provider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn supports_output_schema(&self) -> bool {
        self.structured_output
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, GatewayError> {
        let url = format!("{}/api/chat", self.base_url);
        let body = self.build_body(&request);

        debug!(
            model = %request.model,
            messages = body.messages.len(),
            constrained = body.format.is_some(),
            "Sending Ollama chat request"
        );

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 404 {
            return Err(GatewayError::ModelNotFound(request.model));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Ollama returned error");
            return Err(GatewayError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(format!("Failed to parse response: {e}")))?;

        Ok(api_response.into_provider_response(&request.model))
    }

    async fn health_check(&self) -> std::result::Result<bool, GatewayError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        Ok(response.status().is_success())
    }
}

// --- Ollama API types (internal) ---

#[derive(Debug, Serialize)]
struct ChatBody {
    model: String,
    messages: Vec<ApiMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<ChatOptions>,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    message: ApiMessage,
}

impl ChatResponse {
    fn into_provider_response(self, requested_model: &str) -> ProviderResponse {
        let role = Role::parse(&self.message.role).unwrap_or(Role::Assistant);
        ProviderResponse {
            message: Message::new(role, self.message.content),
            model: self.model.unwrap_or_else(|| requested_model.to_string()),
        }
    }
}
