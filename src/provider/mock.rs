//! @ai:module:intent Deterministic in-process provider for tests and offline runs
//! @ai:module:layer infrastructure
//! @ai:module:public_api MockProvider, MockReply
//! @ai:module:stateless false

use crate::error::{Error, Result};
use crate::provider::{CompletionRequest, CompletionResponse, PricingTable, Provider, RunContext};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

const MODELS: &[&str] = &["mock", "mock-fast", "mock-slow"];

/// @ai:intent One scripted outcome returned by the mock provider
#[derive(Debug, Clone, PartialEq)]
pub struct MockReply {
    outcome: std::result::Result<Option<String>, String>,
    latency_ms: u64,
    tokens: Option<(u32, u32)>,
    cost: Option<f64>,
}

impl MockReply {
    /// @ai:intent Successful reply that echoes the prompt
    pub fn ok() -> Self {
        Self {
            outcome: Ok(None),
            latency_ms: 0,
            tokens: None,
            cost: None,
        }
    }

    /// @ai:intent Successful reply with fixed text
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            outcome: Ok(Some(text.into())),
            ..Self::ok()
        }
    }

    /// @ai:intent Failed call surfacing as an execution error
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            ..Self::ok()
        }
    }

    pub fn latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn tokens(mut self, input: u32, output: u32) -> Self {
        self.tokens = Some((input, output));
        self
    }

    pub fn cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }
}

/// @ai:intent Provider double: echoes prompts or plays back a script
pub struct MockProvider {
    pricing: Arc<PricingTable>,
    delay: Option<Duration>,
    script: Mutex<VecDeque<MockReply>>,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            pricing: Arc::new(PricingTable::default()),
            delay: None,
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_pricing(mut self, pricing: Arc<PricingTable>) -> Self {
        self.pricing = pricing;
        self
    }

    /// @ai:intent Sleep before every reply so cancellation and timeouts can be exercised
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// @ai:intent Queue replies consumed in order; echo resumes once drained
    pub fn with_script(self, replies: impl IntoIterator<Item = MockReply>) -> Self {
        self.lock_script().extend(replies);
        self
    }

    /// Number of `complete` calls received so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn lock_script(&self) -> MutexGuard<'_, VecDeque<MockReply>> {
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// @ai:intent Produce the response for one call
    /// @ai:effects state:write, time
    async fn reply(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self.lock_script().pop_front().unwrap_or_else(MockReply::ok);

        let text = match reply.outcome {
            Ok(Some(text)) => text,
            Ok(None) => request.prompt.clone(),
            Err(message) => return Err(Error::Execution(message)),
        };

        let (input_tokens, output_tokens) = reply
            .tokens
            .unwrap_or_else(|| (word_tokens(&request.prompt), word_tokens(&text)));

        let latency_ms = match (reply.latency_ms, self.delay) {
            (0, Some(delay)) => delay.as_millis() as u64,
            (latency, _) => latency,
        };

        Ok(CompletionResponse {
            cost: reply.cost.unwrap_or_else(|| {
                self.pricing.cost(&request.model, input_tokens, output_tokens)
            }),
            text,
            model: request.model.clone(),
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
            latency_ms,
        })
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(
        &self,
        ctx: &RunContext,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ctx.run(self.reply(request)).await
    }

    fn models(&self) -> Vec<String> {
        MODELS.iter().map(|m| m.to_string()).collect()
    }

    fn supports(&self, model: &str) -> bool {
        model.to_lowercase().starts_with("mock")
    }
}

fn word_tokens(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}
