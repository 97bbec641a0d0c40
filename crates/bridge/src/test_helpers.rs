//! Scripted provider for bridge tests.

use std::sync::Mutex;
use std::time::Duration;

use carebridge_core::error::GatewayError;
use carebridge_core::message::Message;
use carebridge_core::provider::{Provider, ProviderRequest, ProviderResponse};

#[derive(Clone)]
pub enum Step {
    Reply(String),
    Fail(GatewayError),
    Stall(Duration),
}

/// Plays back a fixed list of outcomes and records every request it sees.
pub struct ScriptedProvider {
    steps: Mutex<Vec<Step>>,
    requests: Mutex<Vec<ProviderRequest>>,
    schema_support: bool,
}

impl ScriptedProvider {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps),
            requests: Mutex::new(Vec::new()),
            schema_support: false,
        }
    }

    pub fn text(reply: &str) -> Self {
        Self::new(vec![Step::Reply(reply.into())])
    }

    pub fn failing(error: GatewayError) -> Self {
        Self::new(vec![Step::Fail(error)])
    }

    pub fn with_schema_support(mut self) -> Self {
        self.schema_support = true;
        self
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn supports_output_schema(&self) -> bool {
        self.schema_support
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, GatewayError> {
        let model = request.model.clone();
        let step = {
            let mut requests = self.requests.lock().unwrap();
            let steps = self.steps.lock().unwrap();
            let step = steps.get(requests.len()).cloned().unwrap_or_else(|| {
                panic!(
                    "ScriptedProvider exhausted: call #{}, have {}",
                    requests.len(),
                    steps.len()
                )
            });
            requests.push(request);
            step
        };

        match step {
            Step::Reply(text) => Ok(ProviderResponse {
                message: Message::assistant(text),
                model,
            }),
            Step::Fail(error) => Err(error),
            Step::Stall(delay) => {
                tokio::time::sleep(delay).await;
                Ok(ProviderResponse {
                    message: Message::assistant("too late"),
                    model,
                })
            }
        }
    }
}
