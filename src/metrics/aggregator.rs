//! @ai:module:intent Statistical aggregation for benchmark runs
//! @ai:module:layer application
//! @ai:module:public_api MetricsAggregator, MetricsAggregatorTrait, percentile, average
//! @ai:module:stateless true

use crate::metrics::types::{ModelResult, RunResult};

/// @ai:intent Trait for per-model aggregation
pub trait MetricsAggregatorTrait: Send + Sync {
    /// @ai:intent Aggregate one model's iterations into a ModelResult
    fn aggregate_model(&self, model: &str, runs: &[RunResult]) -> ModelResult;
}

/// @ai:intent Aggregates run telemetry into percentile, average and cost summaries
pub struct MetricsAggregator;

impl MetricsAggregator {
    /// @ai:intent Create a new metrics aggregator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// @ai:intent Nearest-rank percentile over an ascending slice
/// @ai:pre `sorted` is in ascending order
/// @ai:post index = floor(p * n / 100) clipped to n - 1; 0 for an empty slice
/// @ai:effects pure
pub fn percentile(sorted: &[u64], p: u32) -> u64 {
    if sorted.is_empty() {
        return 0;
    }

    let index = (p as usize * sorted.len()) / 100;
    sorted[index.min(sorted.len() - 1)]
}

/// @ai:intent Arithmetic mean, 0 for an empty slice
/// @ai:effects pure
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

impl MetricsAggregatorTrait for MetricsAggregator {
    /// @ai:intent Aggregate iterations; averages over successes only, error rate over all
    /// @ai:effects pure
    fn aggregate_model(&self, model: &str, runs: &[RunResult]) -> ModelResult {
        let iterations = runs.len() as u32;
        let successes: Vec<&RunResult> = runs.iter().filter(|r| !r.is_error()).collect();
        let errors = iterations - successes.len() as u32;

        let error_rate = if iterations == 0 {
            0.0
        } else {
            errors as f64 / iterations as f64
        };

        if successes.is_empty() {
            return ModelResult {
                model: model.to_string(),
                iterations,
                p50_latency_ms: None,
                p99_latency_ms: None,
                avg_latency_ms: None,
                avg_total_tokens: None,
                avg_output_tokens: None,
                cost_per_request: None,
                total_cost: None,
                errors,
                error_rate,
            };
        }

        let mut latencies: Vec<u64> = successes.iter().map(|r| r.latency_ms).collect();
        latencies.sort_unstable();

        let latency: Vec<f64> = successes.iter().map(|r| r.latency_ms as f64).collect();
        let total_tokens: Vec<f64> = successes.iter().map(|r| r.total_tokens as f64).collect();
        let output_tokens: Vec<f64> = successes.iter().map(|r| r.output_tokens as f64).collect();
        let total_cost: f64 = successes.iter().map(|r| r.cost).sum();

        ModelResult {
            model: model.to_string(),
            iterations,
            p50_latency_ms: Some(percentile(&latencies, 50)),
            p99_latency_ms: Some(percentile(&latencies, 99)),
            avg_latency_ms: Some(average(&latency)),
            avg_total_tokens: Some(average(&total_tokens)),
            avg_output_tokens: Some(average(&output_tokens)),
            cost_per_request: Some(total_cost / successes.len() as f64),
            total_cost: Some(total_cost),
            errors,
            error_rate,
        }
    }
}
