//! @ai:module:intent Report generation for test and benchmark results
//! @ai:module:layer infrastructure
//! @ai:module:public_api ReportGenerator, JsonReporter, MarkdownReporter, ChartGenerator

pub mod charts;
pub mod json_report;
pub mod markdown_report;

pub use charts::{ChartGenerator, ChartGeneratorTrait};
pub use json_report::{JsonReporter, JsonReporterTrait};
pub use markdown_report::{MarkdownReporter, MarkdownReporterTrait};

use crate::metrics::{BenchmarkResult, SuiteResult};
use anyhow::Result;
use std::path::Path;

/// @ai:intent Combined report generator
pub struct ReportGenerator {
    json: JsonReporter,
    markdown: MarkdownReporter,
    charts: ChartGenerator,
}

impl ReportGenerator {
    /// @ai:intent Create a new report generator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            json: JsonReporter::new(),
            markdown: MarkdownReporter::new(),
            charts: ChartGenerator::new(),
        }
    }

    /// @ai:intent Write JSON, Markdown and chart reports for a benchmark run
    /// @ai:effects fs:write
    pub fn generate_benchmark(&self, result: &BenchmarkResult, output_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(output_dir)?;

        self.json
            .write_benchmark(result, &output_dir.join("results.json"))?;
        self.markdown
            .write_benchmark(result, &output_dir.join("results.md"))?;
        self.charts.generate_all(result, output_dir)?;

        tracing::info!("Reports generated in {}", output_dir.display());
        Ok(())
    }

    /// @ai:intent Write JSON and Markdown reports for a suite run, named after the suite
    /// @ai:effects fs:write
    pub fn generate_suite(&self, result: &SuiteResult, output_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(output_dir)?;

        let stem = file_stem(&result.suite);
        self.json
            .write_suite(result, &output_dir.join(format!("{}.json", stem)))?;
        self.markdown
            .write_suite(result, &output_dir.join(format!("{}.md", stem)))?;

        tracing::info!("Suite report for {} written to {}", result.suite, output_dir.display());
        Ok(())
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
