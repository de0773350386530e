//! @ai:module:intent Output-execution contract used by the test runner
//! @ai:module:layer application
//! @ai:module:public_api OutputExecutor, EchoExecutor, ProviderExecutor
//! @ai:module:stateless true

use crate::error::Result;
use crate::provider::{CompletionRequest, Registry, RunContext};
use crate::value::Bindings;
use async_trait::async_trait;
use std::sync::Arc;

/// @ai:intent Turn rendered prompt text into output text
#[async_trait]
pub trait OutputExecutor: Send + Sync {
    /// @ai:intent Produce output for one rendered test case
    async fn execute(&self, ctx: &RunContext, rendered: &str, bindings: &Bindings)
        -> Result<String>;
}

/// @ai:intent Deterministic executor that returns the rendered text unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoExecutor;

impl EchoExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OutputExecutor for EchoExecutor {
    /// @ai:effects pure
    async fn execute(&self, _ctx: &RunContext, rendered: &str, _bindings: &Bindings) -> Result<String> {
        Ok(rendered.to_string())
    }
}

/// @ai:intent Executor that sends rendered text to a model through the registry
pub struct ProviderExecutor {
    registry: Arc<Registry>,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl ProviderExecutor {
    /// @ai:intent Create an executor for one model id
    /// @ai:effects pure
    pub fn new(registry: Arc<Registry>, model: impl Into<String>, max_tokens: u32, temperature: f32) -> Self {
        Self {
            registry,
            model: model.into(),
            max_tokens,
            temperature,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl OutputExecutor for ProviderExecutor {
    /// @ai:intent Complete the rendered text with the configured model
    /// @ai:post Err(NotRegistered) when no adapter serves the model
    /// @ai:effects network
    async fn execute(&self, ctx: &RunContext, rendered: &str, bindings: &Bindings) -> Result<String> {
        let provider = self.registry.lookup_for_model(&self.model)?;

        let mut request = CompletionRequest::new(&self.model, rendered)
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature);
        request.variables = Some(bindings.clone());

        let response = provider.complete(ctx, &request).await?;
        Ok(response.text)
    }
}
