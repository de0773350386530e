//! @ai:module:intent Suite definitions, loading and validation
//! @ai:module:layer domain
//! @ai:module:public_api TestSuite, TestCase, Assertion, AssertionKind, BenchmarkSuite, SuiteLoader

pub mod loader;
pub mod types;
pub mod validate;

pub use loader::{SuiteFile, SuiteLoader, SuiteLoaderTrait};
pub use types::{
    Assertion, AssertionKind, BenchmarkSuite, TestCase, TestSuite, DEFAULT_RUNS_PER_MODEL,
};
pub use validate::{validate_benchmark_suite, validate_test_suite};
