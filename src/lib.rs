//! @ai:module:intent Prompt evaluation and benchmarking engine library
//! @ai:module:layer application
//! @ai:module:public_api assertion, config, error, metrics, provider, report, runner, store, suite, template, value

pub mod assertion;
pub mod config;
pub mod error;
pub mod metrics;
pub mod provider;
pub mod report;
pub mod runner;
pub mod store;
pub mod suite;
pub mod template;
pub mod value;

pub use assertion::{evaluate, AssertionResult};
pub use config::{EngineConfig, TestFilter};
pub use error::{Error, Result};
pub use metrics::{BenchmarkResult, MetricsAggregator, ModelResult, RunResult, SuiteResult, TestResult};
pub use provider::{
    build_registry, CompletionRequest, CompletionResponse, PricingTable, Provider, Registry,
    RunContext,
};
pub use report::ReportGenerator;
pub use runner::{BenchmarkRunner, EchoExecutor, OutputExecutor, ProviderExecutor, TestRunner};
pub use store::{ContentStore, DirectoryStore, MemoryStore, SnapshotStore};
pub use suite::{Assertion, AssertionKind, BenchmarkSuite, SuiteLoader, TestCase, TestSuite};
pub use template::render;
pub use value::{Bindings, Value};
