//! @ai:module:intent JSON report generation
//! @ai:module:layer infrastructure
//! @ai:module:public_api JsonReporter
//! @ai:module:stateless true

use crate::metrics::{BenchmarkResult, SuiteResult};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// @ai:intent Trait for JSON report generation
pub trait JsonReporterTrait: Send + Sync {
    /// @ai:intent Write a suite result as pretty JSON
    fn write_suite(&self, result: &SuiteResult, output_path: &Path) -> Result<()>;

    /// @ai:intent Write a benchmark result as pretty JSON
    fn write_benchmark(&self, result: &BenchmarkResult, output_path: &Path) -> Result<()>;
}

/// @ai:intent Generates JSON reports from run results
pub struct JsonReporter;

impl JsonReporter {
    /// @ai:intent Create a new JSON reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Read a benchmark result previously written by this reporter
    /// @ai:effects fs:read
    pub fn load_benchmark(&self, path: &Path) -> Result<BenchmarkResult> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read results {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse results {}", path.display()))
    }

    fn write<T: Serialize>(value: &T, output_path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        std::fs::write(output_path, json)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        Ok(())
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReporterTrait for JsonReporter {
    /// @ai:effects fs:write
    fn write_suite(&self, result: &SuiteResult, output_path: &Path) -> Result<()> {
        Self::write(result, output_path)
    }

    /// @ai:effects fs:write
    fn write_benchmark(&self, result: &BenchmarkResult, output_path: &Path) -> Result<()> {
        Self::write(result, output_path)
    }
}
