//! Provider trait: the abstraction over LLM backends.
//!
//! A Provider executes one round-trip: it sends an ordered message sequence to
//! an LLM and returns the generated text. Callers may attach an output schema;
//! backends that can honor it constrain generation to JSON matching it.
//!
//! Implementations: Ollama (native API), OpenAI-compatible endpoints.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::GatewayError;
use crate::message::Message;

/// A single request to the LLM backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model to use (e.g., "phi3:mini", "gpt-4o-mini")
    pub model: String,

    /// The conversation messages, in send order
    pub messages: Vec<Message>,

    /// Sampling temperature; `None` leaves the backend default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// JSON Schema the output must conform to (schema-constrained mode)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<serde_json::Value>,
}

impl ProviderRequest {
    /// An unconstrained request.
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
            output_schema: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Constrain the output to the given JSON Schema.
    pub fn with_output_schema(mut self, schema: serde_json::Value) -> Self {
        self.output_schema = Some(schema);
        self
    }
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// The generated message
    pub message: Message,

    /// Which model actually responded (may differ from requested)
    pub model: String,
}

impl ProviderResponse {
    /// The raw generated text.
    pub fn text(&self) -> &str {
        &self.message.content
    }
}

/// The core Provider trait.
///
/// Every LLM backend implements this trait. The bridge calls `complete()`
/// without knowing which backend is in use.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "ollama", "openai").
    fn name(&self) -> &str;

    /// Whether this backend can honor `ProviderRequest::output_schema`.
    ///
    /// Backends returning `false` ignore the schema; the caller must not
    /// assume the output is JSON either way.
    fn supports_output_schema(&self) -> bool {
        false
    }

    /// Send a request and get a complete response.
    async fn complete(&self, request: ProviderRequest) -> std::result::Result<ProviderResponse, GatewayError>;

    /// Whether the backend is reachable.
    async fn health_check(&self) -> std::result::Result<bool, GatewayError> {
        Ok(true)
    }
}
