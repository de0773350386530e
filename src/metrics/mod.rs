//! @ai:module:intent Result types and statistical aggregation
//! @ai:module:layer application
//! @ai:module:public_api SuiteResult, TestResult, AssertionResult, RunResult, ModelResult, BenchmarkResult, MetricsAggregator, percentile, average

pub mod aggregator;
pub mod types;

pub use crate::assertion::AssertionResult;
pub use aggregator::{average, percentile, MetricsAggregator, MetricsAggregatorTrait};
pub use types::{BenchmarkResult, ModelResult, RunResult, SuiteResult, TestResult};
