//! @ai:module:intent Benchmark one rendered prompt across several models
//! @ai:module:layer application
//! @ai:module:public_api BenchmarkRunner, BenchOptions
//! @ai:module:stateless false

use crate::error::Result;
use crate::metrics::{BenchmarkResult, MetricsAggregator, MetricsAggregatorTrait, RunResult};
use crate::provider::{CompletionRequest, Provider, Registry, RunContext};
use crate::store::ContentStore;
use crate::suite::BenchmarkSuite;
use crate::template;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;

/// Output-token cap when none is configured
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
/// Sampling temperature when none is configured
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// @ai:intent Sampling and iteration overrides for a benchmark run
#[derive(Debug, Clone, PartialEq)]
pub struct BenchOptions {
    pub max_tokens: u32,
    pub temperature: f32,
    /// Replaces the suite's `runs_per_model` when set
    pub runs: Option<u32>,
}

impl Default for BenchOptions {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            runs: None,
        }
    }
}

/// @ai:intent Runs benchmark suites model by model, iteration by iteration
pub struct BenchmarkRunner {
    store: Arc<dyn ContentStore>,
    registry: Arc<Registry>,
    aggregator: MetricsAggregator,
    options: BenchOptions,
}

impl BenchmarkRunner {
    /// @ai:intent Create a new benchmark runner
    /// @ai:effects pure
    pub fn new(store: Arc<dyn ContentStore>, registry: Arc<Registry>) -> Self {
        Self {
            store,
            registry,
            aggregator: MetricsAggregator::new(),
            options: BenchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: BenchOptions) -> Self {
        self.options = options;
        self
    }

    /// @ai:intent Render once, then run every model's iterations sequentially
    /// @ai:pre suite has passed validation
    /// @ai:post Err(NotFound) or Err(Render) before any completion is issued
    /// @ai:post lookup and completion failures are recorded per iteration, never returned as Err
    /// @ai:effects network, time
    pub async fn run(&self, ctx: &RunContext, suite: &BenchmarkSuite) -> Result<BenchmarkResult> {
        let resolved = self.store.resolve(&suite.prompt, suite.version.as_deref())?;
        let rendered = template::render(&resolved.content, &suite.variables)?;

        let started_at = Utc::now();
        let start = Instant::now();
        let iterations = self.options.runs.unwrap_or_else(|| suite.iterations());

        let mut models = Vec::with_capacity(suite.models.len());
        let mut runs = Vec::with_capacity(suite.models.len() * iterations as usize);

        for (i, model) in suite.models.iter().enumerate() {
            tracing::info!(
                "[{}/{}] Benchmarking {} ({} runs)",
                i + 1,
                suite.models.len(),
                model,
                iterations
            );

            let model_runs = match self.registry.lookup_for_model(model) {
                Ok(provider) => {
                    self.run_model(ctx, provider.as_ref(), suite, model, &rendered, iterations)
                        .await
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", model, e);
                    (1..=iterations)
                        .map(|iteration| RunResult::failure(model, iteration, e.to_string()))
                        .collect()
                }
            };

            let summary = self.aggregator.aggregate_model(model, &model_runs);
            tracing::info!(
                "{}: p50={:?}ms errors={}/{}",
                model,
                summary.p50_latency_ms,
                summary.errors,
                summary.iterations
            );

            models.push(summary);
            runs.extend(model_runs);
        }

        Ok(BenchmarkResult {
            suite: suite.name.clone(),
            prompt: resolved.name,
            version: resolved.version,
            models,
            runs,
            duration_ms: start.elapsed().as_millis() as u64,
            started_at,
            completed_at: Utc::now(),
        })
    }

    /// @ai:intent Issue the iterations for one model, isolating each failure
    /// @ai:effects network
    async fn run_model(
        &self,
        ctx: &RunContext,
        provider: &dyn Provider,
        suite: &BenchmarkSuite,
        model: &str,
        rendered: &str,
        iterations: u32,
    ) -> Vec<RunResult> {
        let mut request = CompletionRequest::new(model, rendered)
            .with_max_tokens(self.options.max_tokens)
            .with_temperature(self.options.temperature);
        if !suite.variables.is_empty() {
            request.variables = Some(suite.variables.clone());
        }

        let mut runs = Vec::with_capacity(iterations as usize);

        for iteration in 1..=iterations {
            match provider.complete(ctx, &request).await {
                Ok(response) => {
                    tracing::debug!(
                        "{} #{}: {}ms, {} tokens",
                        model,
                        iteration,
                        response.latency_ms,
                        response.total_tokens
                    );
                    runs.push(RunResult::success(model, iteration, &response));
                }
                Err(e) => {
                    tracing::warn!("{} #{} failed: {}", model, iteration, e);
                    runs.push(RunResult::failure(model, iteration, e.to_string()));
                }
            }
        }

        runs
    }
}
