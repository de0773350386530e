//! @ai:module:intent Result types for test and benchmark runs
//! @ai:module:layer domain
//! @ai:module:public_api SuiteResult, TestResult, RunResult, ModelResult, BenchmarkResult
//! @ai:module:stateless true

use crate::assertion::AssertionResult;
use crate::provider::CompletionResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// @ai:intent Outcome of a single test case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub skipped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Failed assertions, in declaration order
    #[serde(default)]
    pub failures: Vec<AssertionResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl TestResult {
    /// @ai:intent Result for a case that was not executed
    /// @ai:effects pure
    pub fn skipped(name: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            skipped: true,
            output: None,
            failures: vec![],
            error: None,
            duration_ms: 0,
        }
    }

    /// @ai:intent Failed result for a render or execution error
    /// @ai:effects pure
    pub fn errored(name: &str, error: String, output: Option<String>, duration_ms: u64) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            skipped: false,
            output,
            failures: vec![],
            error: Some(error),
            duration_ms,
        }
    }

    /// @ai:intent Result for an executed case; passed when no assertion failed
    /// @ai:effects pure
    pub fn evaluated(
        name: &str,
        output: String,
        failures: Vec<AssertionResult>,
        duration_ms: u64,
    ) -> Self {
        Self {
            name: name.to_string(),
            passed: failures.is_empty(),
            skipped: false,
            output: Some(output),
            failures,
            error: None,
            duration_ms,
        }
    }
}

/// @ai:intent Counters and per-case results for one suite run
/// @ai:post total == passed + failed + skipped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteResult {
    pub suite: String,
    pub prompt: String,
    pub version: String,
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
    pub total: u32,
    pub results: Vec<TestResult>,
    pub duration_ms: u64,
}

impl SuiteResult {
    pub fn new(suite: &str, prompt: &str, version: &str) -> Self {
        Self {
            suite: suite.to_string(),
            prompt: prompt.to_string(),
            version: version.to_string(),
            passed: 0,
            failed: 0,
            skipped: 0,
            total: 0,
            results: vec![],
            duration_ms: 0,
        }
    }

    /// @ai:intent Append a case result, bumping exactly one disposition counter
    /// @ai:effects state:write
    pub fn record(&mut self, result: TestResult) {
        if result.skipped {
            self.skipped += 1;
        } else if result.passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.total += 1;
        self.results.push(result);
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &TestResult> {
        self.results.iter().filter(|r| !r.passed && !r.skipped)
    }
}

/// @ai:intent Telemetry for exactly one benchmark iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub model: String,
    pub iteration: u32,
    pub latency_ms: u64,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
    pub cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunResult {
    /// @ai:effects pure
    pub fn success(model: &str, iteration: u32, response: &CompletionResponse) -> Self {
        Self {
            model: model.to_string(),
            iteration,
            latency_ms: response.latency_ms,
            input_tokens: response.input_tokens,
            output_tokens: response.output_tokens,
            total_tokens: response.total_tokens,
            cost: response.cost,
            output: Some(response.text.clone()),
            error: None,
        }
    }

    /// @ai:effects pure
    pub fn failure(model: &str, iteration: u32, error: String) -> Self {
        Self {
            model: model.to_string(),
            iteration,
            latency_ms: 0,
            input_tokens: 0,
            output_tokens: 0,
            total_tokens: 0,
            cost: 0.0,
            output: None,
            error: Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// @ai:intent Per-model aggregate; latency, token and cost fields are absent when no iteration succeeded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResult {
    pub model: String,
    pub iterations: u32,
    pub p50_latency_ms: Option<u64>,
    pub p99_latency_ms: Option<u64>,
    pub avg_latency_ms: Option<f64>,
    pub avg_total_tokens: Option<f64>,
    pub avg_output_tokens: Option<f64>,
    pub cost_per_request: Option<f64>,
    pub total_cost: Option<f64>,
    pub errors: u32,
    pub error_rate: f64,
}

impl ModelResult {
    pub fn successes(&self) -> u32 {
        self.iterations - self.errors
    }
}

/// @ai:intent Complete benchmark run across all configured models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub suite: String,
    pub prompt: String,
    pub version: String,
    pub models: Vec<ModelResult>,
    /// Ordered by model, then iteration
    pub runs: Vec<RunResult>,
    pub duration_ms: u64,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl BenchmarkResult {
    pub fn model(&self, model: &str) -> Option<&ModelResult> {
        self.models.iter().find(|m| m.model == model)
    }

    pub fn runs_for<'a>(&'a self, model: &'a str) -> impl Iterator<Item = &'a RunResult> + 'a {
        self.runs.iter().filter(move |r| r.model == model)
    }
}
