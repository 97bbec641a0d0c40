//! The conversation bridge service.

use std::sync::Arc;
use std::time::Duration;

use carebridge_config::{AppConfig, SummaryStrategy};
use carebridge_core::error::{Error, GatewayError, Result};
use carebridge_core::message::Message;
use carebridge_core::provider::{Provider, ProviderRequest};
use carebridge_core::summary::SummaryResult;
use carebridge_persona::PersonaCatalog;
use tracing::{debug, error, info, warn};

use crate::assembler;
use crate::normalize;
use crate::request::BridgeRequest;
use crate::summary::SummaryExtractor;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Runs chat and summary turns against one provider.
///
/// Holds no per-request state; one instance serves every request
/// concurrently.
pub struct ConversationBridge {
    provider: Arc<dyn Provider>,
    catalog: Arc<PersonaCatalog>,
    model: String,
    temperature: Option<f32>,
    timeout: Duration,
    extractor: SummaryExtractor,
}

impl ConversationBridge {
    pub fn new(
        provider: Arc<dyn Provider>,
        catalog: Arc<PersonaCatalog>,
        model: impl Into<String>,
    ) -> Self {
        let extractor =
            SummaryExtractor::for_strategy(SummaryStrategy::Auto, provider.supports_output_schema());
        Self {
            provider,
            catalog,
            model: model.into(),
            temperature: None,
            timeout: DEFAULT_TIMEOUT,
            extractor,
        }
    }

    /// Build a bridge with the model, temperature, timeout, and summary
    /// strategy taken from config.
    pub fn from_config(
        config: &AppConfig,
        provider: Arc<dyn Provider>,
        catalog: Arc<PersonaCatalog>,
    ) -> Self {
        Self::new(provider, catalog, &config.default_model)
            .with_temperature(Some(config.default_temperature))
            .with_timeout(Duration::from_secs(config.gateway.request_timeout_secs))
            .with_strategy(config.summary.strategy)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_strategy(mut self, strategy: SummaryStrategy) -> Self {
        self.extractor =
            SummaryExtractor::for_strategy(strategy, self.provider.supports_output_schema());
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn extractor(&self) -> SummaryExtractor {
        self.extractor
    }

    pub fn catalog(&self) -> &PersonaCatalog {
        &self.catalog
    }

    /// One chat turn: persona instruction plus history in, assistant reply out.
    ///
    /// Selector and message errors are returned as-is. Gateway failures are
    /// logged here with full detail before being returned.
    pub async fn chat(&self, request: BridgeRequest) -> Result<Message> {
        let key = normalize::normalize_selector(
            &self.catalog,
            &request.language,
            &request.condition,
            &request.role,
        )?;
        let history = normalize::normalize_messages(request.messages)?;

        let instruction = self
            .catalog
            .resolve_instruction(&key)
            .ok_or_else(|| Error::Internal(format!("no instruction for persona {key}")))?;

        info!(persona = %key, history = history.len(), "Chat turn");

        let messages = assembler::assemble_chat(instruction, history);
        let reply = self.execute(messages, None).await.inspect_err(|e| {
            error!(persona = %key, error = %e, "Chat completion failed");
        })?;

        Ok(Message::assistant(reply))
    }

    /// Summarize a history. Never fails: any error yields an empty summary.
    pub async fn summarize(&self, request: BridgeRequest) -> SummaryResult {
        match self.try_summarize(request).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(
                    strategy = self.extractor.name(),
                    error = %e,
                    "Summary extraction failed, returning empty summary"
                );
                SummaryResult::empty()
            }
        }
    }

    async fn try_summarize(&self, request: BridgeRequest) -> Result<SummaryResult> {
        let language = normalize::normalize_language(&self.catalog, &request.language);
        let history = normalize::normalize_messages(request.messages)?;

        let instruction = self
            .catalog
            .resolve_summary_instruction(&language, self.extractor.format())
            .ok_or_else(|| Error::Internal(format!("no summary template for {language}")))?;

        info!(
            language = %language,
            history = history.len(),
            strategy = self.extractor.name(),
            "Summary turn"
        );

        let messages = assembler::assemble_summary(instruction, &history);
        let raw = self
            .execute(messages, self.extractor.output_schema())
            .await?;
        debug!(raw = %raw, "Summary model output");

        let summary = self.extractor.extract(&raw)?;
        debug!(
            symptoms = summary.symptoms.len(),
            recommendations = summary.recommendations.len(),
            "Summary extracted"
        );
        Ok(summary)
    }

    /// The single provider round-trip, bounded by the configured timeout.
    async fn execute(
        &self,
        messages: Vec<Message>,
        output_schema: Option<serde_json::Value>,
    ) -> std::result::Result<String, GatewayError> {
        let mut request =
            ProviderRequest::new(&self.model, messages).with_temperature(self.temperature);
        if let Some(schema) = output_schema {
            request = request.with_output_schema(schema);
        }

        debug!(
            provider = self.provider.name(),
            model = %self.model,
            messages = request.messages.len(),
            "Calling provider"
        );

        let response = tokio::time::timeout(self.timeout, self.provider.complete(request))
            .await
            .map_err(|_| GatewayError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            })??;

        Ok(response.message.content)
    }
}
