//! @ai:module:intent Test and benchmark orchestration
//! @ai:module:layer application
//! @ai:module:public_api OutputExecutor, EchoExecutor, ProviderExecutor, TestRunner, BenchmarkRunner

pub mod bench_runner;
pub mod executor;
pub mod test_runner;

pub use bench_runner::{BenchOptions, BenchmarkRunner, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
pub use executor::{EchoExecutor, OutputExecutor, ProviderExecutor};
pub use test_runner::{TestRunOptions, TestRunner};
