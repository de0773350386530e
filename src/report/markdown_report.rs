//! @ai:module:intent Markdown report generation
//! @ai:module:layer infrastructure
//! @ai:module:public_api MarkdownReporter
//! @ai:module:stateless true

use crate::metrics::{BenchmarkResult, ModelResult, SuiteResult};
use anyhow::Result;
use std::fmt::Write as FmtWrite;
use std::path::Path;

/// @ai:intent Trait for Markdown report generation
pub trait MarkdownReporterTrait: Send + Sync {
    /// @ai:intent Write a suite summary with a failure table
    fn write_suite(&self, result: &SuiteResult, output_path: &Path) -> Result<()>;

    /// @ai:intent Write a model comparison table
    fn write_benchmark(&self, result: &BenchmarkResult, output_path: &Path) -> Result<()>;
}

/// @ai:intent Generates Markdown reports from run results
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// @ai:intent Create a new Markdown reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// Dash for statistics that were not computed
    fn format_ms(value: Option<f64>) -> String {
        value.map(|v| format!("{:.0}ms", v)).unwrap_or_else(|| "-".to_string())
    }

    fn format_cost(value: Option<f64>) -> String {
        value.map(|v| format!("${:.6}", v)).unwrap_or_else(|| "-".to_string())
    }

    /// Pipes and newlines would break the table row
    fn cell(text: &str) -> String {
        let flat = text.replace('|', "\\|").replace('\n', " ");
        if flat.chars().count() > 80 {
            format!("{}...", flat.chars().take(77).collect::<String>())
        } else {
            flat
        }
    }

    /// @ai:intent Render the suite report
    /// @ai:effects pure
    pub fn render_suite(result: &SuiteResult) -> Result<String> {
        let mut out = String::new();

        writeln!(out, "# Test Results: {}", result.suite)?;
        writeln!(out)?;
        writeln!(out, "**Prompt:** {} ({})", result.prompt, result.version)?;
        writeln!(out, "**Duration:** {}ms", result.duration_ms)?;
        writeln!(out)?;
        writeln!(out, "| Passed | Failed | Skipped | Total |")?;
        writeln!(out, "|--------|--------|---------|-------|")?;
        writeln!(
            out,
            "| {} | {} | {} | {} |",
            result.passed, result.failed, result.skipped, result.total
        )?;
        writeln!(out)?;

        if result.failed == 0 {
            writeln!(out, "All tests passed.")?;
            return Ok(out);
        }

        writeln!(out, "## Failures")?;
        writeln!(out)?;
        writeln!(out, "| Test | Assertion | Message |")?;
        writeln!(out, "|------|-----------|---------|")?;

        for test in result.failures() {
            if let Some(error) = &test.error {
                writeln!(out, "| {} | error | {} |", Self::cell(&test.name), Self::cell(error))?;
            }
            for failure in &test.failures {
                writeln!(
                    out,
                    "| {} | {} | {} |",
                    Self::cell(&test.name),
                    failure.kind,
                    Self::cell(&failure.message)
                )?;
            }
        }

        writeln!(out)?;
        Ok(out)
    }

    fn model_row(out: &mut String, model: &ModelResult) -> std::fmt::Result {
        writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {} | {:.1}% |",
            model.model,
            Self::format_ms(model.p50_latency_ms.map(|v| v as f64)),
            Self::format_ms(model.p99_latency_ms.map(|v| v as f64)),
            Self::format_ms(model.avg_latency_ms),
            model
                .avg_total_tokens
                .map(|v| format!("{:.0}", v))
                .unwrap_or_else(|| "-".to_string()),
            Self::format_cost(model.cost_per_request),
            Self::format_cost(model.total_cost),
            model.error_rate * 100.0
        )
    }

    /// @ai:intent Render the benchmark comparison report
    /// @ai:effects pure
    pub fn render_benchmark(result: &BenchmarkResult) -> Result<String> {
        let mut out = String::new();

        writeln!(out, "# Benchmark Results: {}", result.suite)?;
        writeln!(out)?;
        writeln!(out, "**Prompt:** {} ({})", result.prompt, result.version)?;
        writeln!(out, "**Date:** {}", result.started_at.to_rfc3339())?;
        writeln!(out, "**Duration:** {}ms", result.duration_ms)?;
        writeln!(out)?;
        writeln!(out, "## Models")?;
        writeln!(out)?;
        writeln!(
            out,
            "| Model | p50 | p99 | Avg Latency | Avg Tokens | Cost/Request | Total Cost | Error Rate |"
        )?;
        writeln!(
            out,
            "|-------|-----|-----|-------------|------------|--------------|------------|------------|"
        )?;

        for model in &result.models {
            Self::model_row(&mut out, model)?;
        }
        writeln!(out)?;

        let errors: Vec<_> = result.runs.iter().filter(|r| r.is_error()).collect();
        if !errors.is_empty() {
            writeln!(out, "## Errors")?;
            writeln!(out)?;
            for run in errors {
                writeln!(
                    out,
                    "- {} #{}: {}",
                    run.model,
                    run.iteration,
                    run.error.as_deref().unwrap_or_default()
                )?;
            }
            writeln!(out)?;
        }

        Ok(out)
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownReporterTrait for MarkdownReporter {
    /// @ai:effects fs:write
    fn write_suite(&self, result: &SuiteResult, output_path: &Path) -> Result<()> {
        std::fs::write(output_path, Self::render_suite(result)?)?;
        Ok(())
    }

    /// @ai:effects fs:write
    fn write_benchmark(&self, result: &BenchmarkResult, output_path: &Path) -> Result<()> {
        std::fs::write(output_path, Self::render_benchmark(result)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::TestResult;
    use crate::report::tests::sample_benchmark;
    use tempfile::TempDir;

    #[test]
    fn test_formatters() {
        assert_eq!(MarkdownReporter::format_ms(Some(120.4)), "120ms");
        assert_eq!(MarkdownReporter::format_ms(None), "-");
        assert_eq!(MarkdownReporter::format_cost(Some(0.02)), "$0.020000");
        assert_eq!(MarkdownReporter::cell("a|b\nc"), "a\\|b c");
    }

    #[test]
    fn test_benchmark_table() {
        let content = MarkdownReporter::render_benchmark(&sample_benchmark()).unwrap();

        assert!(content.contains("# Benchmark Results: bench"));
        assert!(content.contains("| mock | 200ms | 300ms | 200ms | 30 | $0.020000 | $0.060000 | 0.0% |"));
        assert!(content.contains("| gpt-4o | - | - | - | - | - | - | 100.0% |"));
        assert!(content.contains("- gpt-4o #1: No provider registered"));
    }

    #[test]
    fn test_suite_report_lists_failures() {
        let mut suite = SuiteResult::new("greeting", "hello", "v1");
        suite.record(TestResult::evaluated("ok", "out".into(), vec![], 1));
        suite.record(TestResult::errored("broken", "Execution error: down".into(), None, 1));

        let temp = TempDir::new().unwrap();
        let output = temp.path().join("greeting.md");
        MarkdownReporter::new().write_suite(&suite, &output).unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.contains("| 1 | 1 | 0 | 2 |"));
        assert!(content.contains("| broken | error | Execution error: down |"));
    }

    #[test]
    fn test_suite_report_all_passed() {
        let mut suite = SuiteResult::new("greeting", "hello", "v1");
        suite.record(TestResult::evaluated("ok", "out".into(), vec![], 1));

        let content = MarkdownReporter::render_suite(&suite).unwrap();
        assert!(content.contains("All tests passed."));
        assert!(!content.contains("## Failures"));
    }
}
