//! @ai:module:intent Anthropic Messages API adapter
//! @ai:module:layer infrastructure
//! @ai:module:public_api AnthropicProvider
//! @ai:module:stateless false

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::provider::{
    CompletionRequest, CompletionResponse, PricingTable, Provider, RateLimiter, RunContext,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

const API_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 1024;

const MODELS: &[&str] = &[
    "claude-opus-4-20250514",
    "claude-sonnet-4-20250514",
    "claude-3-5-sonnet-20241022",
    "claude-3-5-haiku-20241022",
    "claude-3-opus-20240229",
    "claude-3-haiku-20240307",
];

/// @ai:intent Messages API request body
#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

/// @ai:intent Messages API response body
#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    model: Option<String>,
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

/// @ai:intent Anthropic adapter with rate limiting
pub struct AnthropicProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    rate_limiter: RateLimiter,
    pricing: Arc<PricingTable>,
}

impl AnthropicProvider {
    /// @ai:intent Create an adapter for the configured endpoint
    /// @ai:effects pure
    pub fn new(api_key: String, config: &ApiConfig, pricing: Arc<PricingTable>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Execution(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.anthropic_base_url.trim_end_matches('/').to_string(),
            api_key,
            rate_limiter: RateLimiter::new(config.requests_per_minute),
            pricing,
        })
    }

    /// @ai:intent Send the request and parse the reply
    /// @ai:effects network
    async fn send(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        self.rate_limiter.acquire().await;

        let body = ApiRequest {
            model: &request.model,
            max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: request.temperature,
            messages: vec![Message {
                role: "user",
                content: &request.prompt,
            }],
        };

        let start = Instant::now();

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Execution(format!("anthropic request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Execution(format!("failed to read anthropic response: {}", e)))?;

        if !status.is_success() {
            return Err(Error::Execution(format!("anthropic API error ({}): {}", status, text)));
        }

        let latency_ms = start.elapsed().as_millis() as u64;
        let parsed = parse_response(&text)?;
        let model = parsed.model.unwrap_or_else(|| request.model.clone());
        let input_tokens = parsed.usage.input_tokens;
        let output_tokens = parsed.usage.output_tokens;

        Ok(CompletionResponse {
            text: join_text(parsed.content),
            cost: self.pricing.cost(&model, input_tokens, output_tokens),
            model,
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
            latency_ms,
        })
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    /// @ai:intent Complete a prompt through the Messages API
    /// @ai:effects network
    async fn complete(
        &self,
        ctx: &RunContext,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse> {
        ctx.run(self.send(request)).await
    }

    fn models(&self) -> Vec<String> {
        MODELS.iter().map(|m| m.to_string()).collect()
    }

    fn supports(&self, model: &str) -> bool {
        model.to_lowercase().starts_with("claude")
    }
}

fn parse_response(body: &str) -> Result<ApiResponse> {
    serde_json::from_str(body)
        .map_err(|e| Error::Execution(format!("failed to parse anthropic response: {}", e)))
}

fn join_text(blocks: Vec<ContentBlock>) -> String {
    blocks
        .into_iter()
        .filter_map(|b| b.text)
        .collect::<Vec<_>>()
        .join("\n")
}
