//! @ai:module:intent Run a test suite: render, execute and assert every selected case
//! @ai:module:layer application
//! @ai:module:public_api TestRunner, TestRunOptions
//! @ai:module:stateless false

use crate::assertion::{evaluate, AssertionResult};
use crate::config::TestFilter;
use crate::error::Result;
use crate::metrics::{SuiteResult, TestResult};
use crate::provider::RunContext;
use crate::runner::executor::OutputExecutor;
use crate::store::{ContentStore, SnapshotStore};
use crate::suite::{Assertion, AssertionKind, TestCase, TestSuite};
use crate::template;
use crate::value::Value;
use std::sync::Arc;
use std::time::Instant;

/// @ai:intent Options for one test run
#[derive(Debug, Clone, Default)]
pub struct TestRunOptions {
    /// Write current output as the new snapshot baseline instead of comparing
    pub update_snapshots: bool,
    pub filter: TestFilter,
}

/// @ai:intent Executes test suites against resolved prompt content
pub struct TestRunner {
    store: Arc<dyn ContentStore>,
    executor: Arc<dyn OutputExecutor>,
    snapshots: Arc<dyn SnapshotStore>,
    options: TestRunOptions,
}

impl TestRunner {
    /// @ai:intent Create a new test runner
    /// @ai:effects pure
    pub fn new(
        store: Arc<dyn ContentStore>,
        executor: Arc<dyn OutputExecutor>,
        snapshots: Arc<dyn SnapshotStore>,
    ) -> Self {
        Self {
            store,
            executor,
            snapshots,
            options: TestRunOptions::default(),
        }
    }

    pub fn with_options(mut self, options: TestRunOptions) -> Self {
        self.options = options;
        self
    }

    /// @ai:intent Run every selected case in order
    /// @ai:pre suite has passed validation
    /// @ai:post Err(NotFound) before any case runs when the prompt or version is absent
    /// @ai:post per-case failures are captured in the result, never returned as Err
    /// @ai:effects network, state:write
    pub async fn run(&self, ctx: &RunContext, suite: &TestSuite) -> Result<SuiteResult> {
        let resolved = self.store.resolve(&suite.prompt, suite.version.as_deref())?;
        let start = Instant::now();

        let cases: Vec<&TestCase> = suite
            .tests
            .iter()
            .filter(|case| self.options.filter.matches(&case.name, &case.tags))
            .collect();

        tracing::info!(
            "Running suite {} against {}@{} ({} of {} tests selected)",
            suite.name,
            resolved.name,
            resolved.version,
            cases.len(),
            suite.tests.len()
        );

        let mut result = SuiteResult::new(&suite.name, &resolved.name, &resolved.version);

        for (i, case) in cases.iter().enumerate() {
            if case.skip {
                tracing::info!("[{}/{}] Skipping {}", i + 1, cases.len(), case.name);
                result.record(TestResult::skipped(&case.name));
                continue;
            }

            tracing::info!("[{}/{}] Running {}", i + 1, cases.len(), case.name);
            let outcome = self.run_case(ctx, suite, &resolved.content, case).await;

            if !outcome.passed {
                tracing::warn!("Test {} failed", case.name);
            }
            result.record(outcome);
        }

        result.duration_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            "Suite {}: {} passed, {} failed, {} skipped",
            result.suite,
            result.passed,
            result.failed,
            result.skipped
        );

        Ok(result)
    }

    /// @ai:intent Render, execute and assert one case
    /// @ai:effects network, state:write
    async fn run_case(
        &self,
        ctx: &RunContext,
        suite: &TestSuite,
        content: &str,
        case: &TestCase,
    ) -> TestResult {
        let start = Instant::now();
        let elapsed = |start: Instant| start.elapsed().as_millis() as u64;

        let rendered = match template::render(content, &case.inputs) {
            Ok(rendered) => rendered,
            Err(e) => return TestResult::errored(&case.name, e.to_string(), None, elapsed(start)),
        };

        let output = match self.executor.execute(ctx, &rendered, &case.inputs).await {
            Ok(output) => output,
            Err(e) => return TestResult::errored(&case.name, e.to_string(), None, elapsed(start)),
        };

        let failures: Vec<AssertionResult> = case
            .assertions
            .iter()
            .map(|assertion| self.check(&suite.name, case, assertion, &output))
            .filter(|r| {
                tracing::debug!("{} {}: passed={}", case.name, r.kind, r.passed);
                !r.passed
            })
            .collect();

        TestResult::evaluated(&case.name, output, failures, elapsed(start))
    }

    /// @ai:intent Evaluate one assertion, resolving or writing snapshot baselines first
    /// @ai:effects fs:read, fs:write
    fn check(
        &self,
        suite: &str,
        case: &TestCase,
        assertion: &Assertion,
        output: &str,
    ) -> AssertionResult {
        if assertion.kind != AssertionKind::Snapshot {
            return evaluate(assertion, output);
        }

        if self.options.update_snapshots {
            return self.update_snapshot(suite, &case.name, output);
        }

        match self.snapshots.get(suite, &case.name) {
            Ok(stored) => {
                let baseline = stored.or_else(|| case.snapshot.clone());
                let resolved = Assertion {
                    value: baseline.map(Value::String),
                    ..assertion.clone()
                };
                evaluate(&resolved, output)
            }
            Err(e) => snapshot_result(false, "", output, format!("failed to read snapshot: {}", e)),
        }
    }

    /// @ai:effects fs:write
    fn update_snapshot(&self, suite: &str, test: &str, output: &str) -> AssertionResult {
        let current = output.trim();

        match self.snapshots.put(suite, test, current) {
            Ok(()) => {
                tracing::info!("Updated snapshot for {}/{}", suite, test);
                snapshot_result(true, current, current, "snapshot updated".to_string())
            }
            Err(e) => snapshot_result(false, "", current, format!("failed to write snapshot: {}", e)),
        }
    }
}

fn snapshot_result(passed: bool, expected: &str, actual: &str, message: String) -> AssertionResult {
    AssertionResult {
        kind: AssertionKind::Snapshot,
        passed,
        expected: expected.to_string(),
        actual: actual.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::runner::executor::EchoExecutor;
    use crate::store::{MemorySnapshotStore, MemoryStore};
    use crate::value::Bindings;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    struct FailingExecutor;

    #[async_trait]
    impl OutputExecutor for FailingExecutor {
        async fn execute(&self, _: &RunContext, _: &str, _: &Bindings) -> Result<String> {
            Err(Error::Execution("backend unavailable".to_string()))
        }
    }

    fn store() -> Arc<MemoryStore> {
        let mut store = MemoryStore::new();
        store
            .add_version("greeting", "v1", "Hi {{name}}")
            .add_version("greeting", "v2", "Hello {{name}}");
        Arc::new(store)
    }

    fn runner_with(
        executor: Arc<dyn OutputExecutor>,
        snapshots: Arc<MemorySnapshotStore>,
    ) -> TestRunner {
        TestRunner::new(store(), executor, snapshots)
    }

    fn case(name: &str, input: &str, assertions: Vec<Assertion>) -> TestCase {
        let mut inputs = Bindings::new();
        inputs.insert("name".to_string(), Value::from(input));
        TestCase {
            name: name.to_string(),
            inputs,
            assertions,
            ..Default::default()
        }
    }

    fn suite(tests: Vec<TestCase>) -> TestSuite {
        TestSuite {
            name: "greeting-suite".to_string(),
            prompt: "greeting".to_string(),
            version: None,
            tests,
        }
    }

    fn contains(value: &str) -> Assertion {
        Assertion::new(AssertionKind::Contains).with_value(value)
    }

    #[tokio::test]
    async fn test_mixed_dispositions() {
        let suite = suite(vec![
            case("passes", "World", vec![contains("Hello World")]),
            case("fails", "World", vec![contains("Goodbye"), contains("Hello")]),
            TestCase {
                name: "skipped".to_string(),
                skip: true,
                ..Default::default()
            },
        ]);
        let runner = runner_with(Arc::new(EchoExecutor), Arc::new(MemorySnapshotStore::new()));

        let result = runner.run(&RunContext::new(), &suite).await.unwrap();

        assert_eq!(result.version, "v2");
        assert_eq!(
            (result.passed, result.failed, result.skipped, result.total),
            (1, 1, 1, 3)
        );
        assert_eq!(result.results[0].output.as_deref(), Some("Hello World"));
        assert_eq!(result.results[1].failures.len(), 1);
        assert_eq!(result.results[1].failures[0].expected, "Goodbye");
        assert!(result.results[2].skipped);
        assert!(result.results[2].failures.is_empty());
        assert!(result.results[2].output.is_none());
    }

    #[tokio::test]
    async fn test_invalid_pattern_fails_only_its_assertion() {
        let bad_pattern = Assertion::new(AssertionKind::Matches).with_value("([unclosed");
        let suite = suite(vec![
            case("pattern", "World", vec![bad_pattern, contains("Hello World")]),
            case("after", "Ann", vec![contains("Hello Ann")]),
        ]);
        let runner = runner_with(Arc::new(EchoExecutor), Arc::new(MemorySnapshotStore::new()));

        let result = runner.run(&RunContext::new(), &suite).await.unwrap();

        assert_eq!((result.passed, result.failed, result.total), (1, 1, 2));
        let pattern = &result.results[0];
        assert!(pattern.error.is_none());
        assert_eq!(pattern.output.as_deref(), Some("Hello World"));
        assert_eq!(pattern.failures.len(), 1);
        assert_eq!(pattern.failures[0].kind, AssertionKind::Matches);
        assert!(pattern.failures[0].message.contains("invalid pattern"));
        assert!(result.results[1].passed);
    }

    #[tokio::test]
    async fn test_missing_prompt_aborts_run() {
        let suite = TestSuite {
            prompt: "unknown".to_string(),
            ..suite(vec![case("a", "x", vec![contains("x")])])
        };
        let runner = runner_with(Arc::new(EchoExecutor), Arc::new(MemorySnapshotStore::new()));

        let result = runner.run(&RunContext::new(), &suite).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_pinned_version_is_used() {
        let suite = TestSuite {
            version: Some("v1".to_string()),
            ..suite(vec![case("a", "Ann", vec![contains("Hi Ann")])])
        };
        let runner = runner_with(Arc::new(EchoExecutor), Arc::new(MemorySnapshotStore::new()));

        let result = runner.run(&RunContext::new(), &suite).await.unwrap();
        assert_eq!(result.version, "v1");
        assert_eq!(result.passed, 1);
    }

    #[tokio::test]
    async fn test_render_error_isolated_to_case() {
        let mut store = MemoryStore::new();
        store.add_version("broken", "v1", "Hello {{name");
        let runner = TestRunner::new(
            Arc::new(store),
            Arc::new(EchoExecutor),
            Arc::new(MemorySnapshotStore::new()),
        );
        let suite = TestSuite {
            prompt: "broken".to_string(),
            ..suite(vec![
                case("a", "x", vec![contains("x")]),
                case("b", "y", vec![contains("y")]),
            ])
        };

        let result = runner.run(&RunContext::new(), &suite).await.unwrap();

        assert_eq!((result.failed, result.total), (2, 2));
        let error = result.results[0].error.as_deref().unwrap();
        assert!(error.contains("render"));
        assert!(result.results[0].output.is_none());
    }

    #[tokio::test]
    async fn test_execution_error_recorded_and_run_continues() {
        let runner = runner_with(Arc::new(FailingExecutor), Arc::new(MemorySnapshotStore::new()));
        let suite = suite(vec![
            case("a", "x", vec![contains("x")]),
            case("b", "y", vec![contains("y")]),
        ]);

        let result = runner.run(&RunContext::new(), &suite).await.unwrap();

        assert_eq!(result.failed, 2);
        assert!(result.results[1]
            .error
            .as_deref()
            .unwrap()
            .contains("backend unavailable"));
    }

    #[tokio::test]
    async fn test_filter_excludes_cases_from_counts() {
        let mut tagged = case("tagged", "x", vec![contains("x")]);
        tagged.tags = vec!["smoke".to_string()];
        let suite = suite(vec![tagged, case("untagged", "y", vec![contains("nope")])]);

        let runner = runner_with(Arc::new(EchoExecutor), Arc::new(MemorySnapshotStore::new()))
            .with_options(TestRunOptions {
                filter: TestFilter::from_lists(Some("smoke"), None),
                ..Default::default()
            });

        let result = runner.run(&RunContext::new(), &suite).await.unwrap();
        assert_eq!((result.passed, result.total), (1, 1));
        assert_eq!(result.results[0].name, "tagged");
    }

    #[tokio::test]
    async fn test_snapshot_without_baseline_fails() {
        let snapshot = Assertion::new(AssertionKind::Snapshot);
        let runner = runner_with(Arc::new(EchoExecutor), Arc::new(MemorySnapshotStore::new()));

        let result = runner
            .run(&RunContext::new(), &suite(vec![case("a", "x", vec![snapshot])]))
            .await
            .unwrap();

        assert_eq!(result.failed, 1);
        assert!(result.results[0].failures[0]
            .message
            .contains("no snapshot stored"));
    }

    #[tokio::test]
    async fn test_snapshot_update_then_compare() {
        let snapshots = Arc::new(MemorySnapshotStore::new());
        let snapshot = Assertion::new(AssertionKind::Snapshot);
        let suite = suite(vec![case("a", "World", vec![snapshot])]);

        let updater = runner_with(Arc::new(EchoExecutor), snapshots.clone()).with_options(
            TestRunOptions {
                update_snapshots: true,
                ..Default::default()
            },
        );
        let updated = updater.run(&RunContext::new(), &suite).await.unwrap();
        assert_eq!(updated.passed, 1);
        assert_eq!(
            snapshots.get("greeting-suite", "a").unwrap().as_deref(),
            Some("Hello World")
        );

        let checker = runner_with(Arc::new(EchoExecutor), snapshots);
        let checked = checker.run(&RunContext::new(), &suite).await.unwrap();
        assert_eq!(checked.passed, 1);
    }

    #[tokio::test]
    async fn test_inline_snapshot_used_when_store_empty() {
        let mut matching = case("a", "World", vec![Assertion::new(AssertionKind::Snapshot)]);
        matching.snapshot = Some("Hello World\n".to_string());
        let mut stale = case("b", "World", vec![Assertion::new(AssertionKind::Snapshot)]);
        stale.snapshot = Some("Hello There".to_string());

        let runner = runner_with(Arc::new(EchoExecutor), Arc::new(MemorySnapshotStore::new()));
        let result = runner
            .run(&RunContext::new(), &suite(vec![matching, stale]))
            .await
            .unwrap();

        assert_eq!((result.passed, result.failed), (1, 1));
    }

    #[tokio::test]
    async fn test_repeated_runs_are_idempotent() {
        let suite = suite(vec![
            case("a", "World", vec![contains("World")]),
            case("b", "World", vec![contains("Nope")]),
            TestCase {
                name: "c".to_string(),
                skip: true,
                ..Default::default()
            },
        ]);
        let runner = runner_with(Arc::new(EchoExecutor), Arc::new(MemorySnapshotStore::new()));
        let ctx = RunContext::new();

        let first = runner.run(&ctx, &suite).await.unwrap();
        let second = runner.run(&ctx, &suite).await.unwrap();

        assert_eq!(
            (first.passed, first.failed, first.skipped, first.total),
            (second.passed, second.failed, second.skipped, second.total)
        );
        assert_eq!(first.results.len(), second.results.len());
    }
}
