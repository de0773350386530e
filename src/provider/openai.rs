//! @ai:module:intent OpenAI Chat Completions API adapter
//! @ai:module:layer infrastructure
//! @ai:module:public_api OpenAiProvider
//! @ai:module:stateless false

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::provider::{
    CompletionRequest, CompletionResponse, PricingTable, Provider, RateLimiter, RunContext,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value as Json};
use std::sync::Arc;
use std::time::{Duration, Instant};

const MODELS: &[&str] = &[
    "gpt-4o",
    "gpt-4o-mini",
    "gpt-4.1",
    "gpt-4.1-mini",
    "gpt-4-turbo",
    "gpt-3.5-turbo",
    "o1",
    "o1-mini",
    "o3-mini",
];

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

/// @ai:intent OpenAI adapter with rate limiting
pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    rate_limiter: RateLimiter,
    pricing: Arc<PricingTable>,
}

impl OpenAiProvider {
    /// @ai:intent Create an adapter for the configured endpoint
    /// @ai:effects pure
    pub fn new(api_key: String, config: &ApiConfig, pricing: Arc<PricingTable>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Execution(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            api_key,
            rate_limiter: RateLimiter::new(config.requests_per_minute),
            pricing,
        })
    }

    /// @ai:intent Send the request and parse the reply
    /// @ai:effects network
    async fn send(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        self.rate_limiter.acquire().await;

        let body = build_body(request);
        let start = Instant::now();

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Execution(format!("openai request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Execution(format!("failed to read openai response: {}", e)))?;

        if !status.is_success() {
            return Err(Error::Execution(format!("openai API error ({}): {}", status, text)));
        }

        let latency_ms = start.elapsed().as_millis() as u64;
        let parsed: ApiResponse = serde_json::from_str(&text)
            .map_err(|e| Error::Execution(format!("failed to parse openai response: {}", e)))?;

        let model = parsed.model.clone().unwrap_or_else(|| request.model.clone());
        let usage = parsed.usage.unwrap_or_default();
        let total_tokens = if usage.total_tokens > 0 {
            usage.total_tokens
        } else {
            usage.prompt_tokens + usage.completion_tokens
        };

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::Execution("openai response contained no choices".to_string()))?;

        Ok(CompletionResponse {
            text,
            cost: self
                .pricing
                .cost(&model, usage.prompt_tokens, usage.completion_tokens),
            model,
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
            total_tokens,
            latency_ms,
        })
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    /// @ai:intent Complete a prompt through the Chat Completions API
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
        let model = model.to_lowercase();
        ["gpt-", "chatgpt-", "o1", "o3"]
            .iter()
            .any(|prefix| model.starts_with(prefix))
    }
}

/// Reasoning models take `max_completion_tokens` and reject `temperature`
fn is_reasoning_model(model: &str) -> bool {
    let model = model.to_lowercase();
    model.starts_with("o1") || model.starts_with("o3")
}

/// @ai:intent Build the Chat Completions request body
/// @ai:effects pure
fn build_body(request: &CompletionRequest) -> Json {
    let mut body = json!({
        "model": request.model,
        "messages": [{"role": "user", "content": request.prompt}],
    });

    let reasoning = is_reasoning_model(&request.model);

    if let Some(max_tokens) = request.max_tokens {
        let key = if reasoning { "max_completion_tokens" } else { "max_tokens" };
        body[key] = json!(max_tokens);
    }

    if let Some(temperature) = request.temperature.filter(|_| !reasoning) {
        body["temperature"] = json!(temperature);
    }

    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_for_chat_model() {
        let request = CompletionRequest::new("gpt-4o", "hello")
            .with_max_tokens(256)
            .with_temperature(0.5);
        let body = build_body(&request);

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["messages"][0]["content"], "hello");
        assert_eq!(body["max_tokens"], 256);
        assert!(body.get("temperature").is_some());
    }

    #[test]
    fn test_body_for_reasoning_model() {
        let request = CompletionRequest::new("o1-mini", "think")
            .with_max_tokens(512)
            .with_temperature(0.7);
        let body = build_body(&request);

        assert_eq!(body["max_completion_tokens"], 512);
        assert!(body.get("max_tokens").is_none());
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_parse_response_shape() {
        let body = r#"{
            "id": "chatcmpl-1",
            "model": "gpt-4o-2024-08-06",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "hi"}}],
            "usage": {"prompt_tokens": 5, "completion_tokens": 2, "total_tokens": 7}
        }"#;

        let parsed: ApiResponse = serde_json::from_str(body).unwrap();
        let usage = parsed.usage.unwrap();
        assert_eq!(usage.total_tokens, 7);
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("hi"));
    }

    #[test]
    fn test_supports_openai_ids() {
        let provider = OpenAiProvider::new(
            "key".to_string(),
            &ApiConfig::default(),
            Arc::new(PricingTable::builtin()),
        )
        .unwrap();
        assert!(provider.supports("GPT-4o-mini"));
        assert!(provider.supports("o3-mini"));
        assert!(!provider.supports("claude-3-opus"));
    }
}
