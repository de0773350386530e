//! @ai:module:intent Backend-agnostic completion contract and vendor adapters
//! @ai:module:layer infrastructure
//! @ai:module:public_api Provider, CompletionRequest, CompletionResponse, RunContext, Registry, PricingTable

pub mod anthropic;
pub mod context;
pub mod cost;
pub mod mock;
pub mod openai;
pub mod rate_limiter;
pub mod registry;

pub use anthropic::AnthropicProvider;
pub use context::RunContext;
pub use cost::{ModelPrice, PricingTable};
pub use mock::{MockProvider, MockReply};
pub use openai::OpenAiProvider;
pub use rate_limiter::RateLimiter;
pub use registry::{Registry, VendorRules, UNKNOWN_VENDOR};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::value::Bindings;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Environment variable holding the Anthropic API key
pub const ANTHROPIC_KEY_ENV: &str = "ANTHROPIC_API_KEY";
/// Environment variable holding the OpenAI API key
pub const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";

/// @ai:intent One completion call against a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Bindings>,
}

impl CompletionRequest {
    /// @ai:intent Create a request with no sampling overrides
    /// @ai:effects pure
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            max_tokens: None,
            temperature: None,
            variables: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// @ai:intent Result of one successful completion call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub text: String,
    pub model: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
    pub latency_ms: u64,
    pub cost: f64,
}

/// @ai:intent Capability contract implemented once per model vendor
#[async_trait]
pub trait Provider: Send + Sync {
    /// @ai:intent Vendor name this adapter is registered under
    fn name(&self) -> &str;

    /// @ai:intent Run one completion, honouring the context's cancellation and timeout
    async fn complete(
        &self,
        ctx: &RunContext,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse>;

    /// @ai:intent Model ids this adapter advertises
    fn models(&self) -> Vec<String>;

    /// @ai:intent Whether this adapter can serve a model id
    fn supports(&self, model: &str) -> bool {
        self.models().iter().any(|m| m == model)
    }
}

/// @ai:intent Build the registry of adapters available in this environment
/// @ai:post mock adapter always registered; vendor adapters only when their API key is set
/// @ai:effects env
pub fn build_registry(config: &EngineConfig) -> Result<Registry> {
    let pricing = Arc::new(PricingTable::builtin().with_overrides(config.pricing.clone()));
    let mut registry = Registry::new(Arc::new(VendorRules::default()));

    registry.register(Arc::new(MockProvider::new().with_pricing(pricing.clone())));

    if let Ok(key) = std::env::var(ANTHROPIC_KEY_ENV) {
        registry.register(Arc::new(AnthropicProvider::new(
            key,
            &config.api,
            pricing.clone(),
        )?));
    } else {
        tracing::debug!("{} not set, anthropic provider unavailable", ANTHROPIC_KEY_ENV);
    }

    if let Ok(key) = std::env::var(OPENAI_KEY_ENV) {
        registry.register(Arc::new(OpenAiProvider::new(key, &config.api, pricing)?));
    } else {
        tracing::debug!("{} not set, openai provider unavailable", OPENAI_KEY_ENV);
    }

    Ok(registry)
}
