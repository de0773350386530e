//! @ai:module:intent TOML loader for test and benchmark suites
//! @ai:module:layer infrastructure
//! @ai:module:public_api SuiteLoader, SuiteLoaderTrait, SuiteFile
//! @ai:module:stateless true

use crate::error::Result;
use crate::suite::types::{BenchmarkSuite, TestSuite};
use crate::suite::validate::{validate_benchmark_suite, validate_test_suite};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// @ai:intent Either kind of suite definition, told apart by the presence of `models`
#[derive(Debug, Clone, PartialEq)]
pub enum SuiteFile {
    Test(TestSuite),
    Benchmark(BenchmarkSuite),
}

impl SuiteFile {
    pub fn name(&self) -> &str {
        match self {
            SuiteFile::Test(suite) => &suite.name,
            SuiteFile::Benchmark(suite) => &suite.name,
        }
    }
}

/// @ai:intent Trait for loading suite definitions
pub trait SuiteLoaderTrait: Send + Sync {
    /// @ai:intent Load and validate a single test suite file
    fn load_test_suite(&self, path: &Path) -> Result<TestSuite>;

    /// @ai:intent Load and validate a single benchmark suite file
    fn load_benchmark_suite(&self, path: &Path) -> Result<BenchmarkSuite>;

    /// @ai:intent Load every valid test suite under a directory
    fn load_test_suites(&self, dir: &Path) -> Result<Vec<TestSuite>>;
}

/// @ai:intent Loads suite definitions from TOML files
/// @ai:effects pure (stateless)
pub struct SuiteLoader;

impl SuiteLoader {
    /// @ai:intent Create a new suite loader
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Find all TOML files in directory, sorted by path
    /// @ai:effects fs:read
    pub fn find_suite_files(dir: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "toml")
                    .unwrap_or(false)
            })
            .map(|e| e.path().to_path_buf())
            .collect();

        files.sort();
        files
    }

    /// @ai:intent Parse and validate a file as whichever suite kind it declares
    /// @ai:effects fs:read
    pub fn load_any(&self, path: &Path) -> Result<SuiteFile> {
        let content = std::fs::read_to_string(path)?;
        let document: toml::Table = toml::from_str(&content)?;

        if document.contains_key("models") {
            let suite: BenchmarkSuite = toml::from_str(&content)?;
            validate_benchmark_suite(&suite)?;
            Ok(SuiteFile::Benchmark(suite))
        } else {
            let suite: TestSuite = toml::from_str(&content)?;
            validate_test_suite(&suite)?;
            Ok(SuiteFile::Test(suite))
        }
    }
}

impl Default for SuiteLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SuiteLoaderTrait for SuiteLoader {
    /// @ai:intent Parse and validate a test suite file
    /// @ai:pre path points to a TOML file
    /// @ai:effects fs:read
    fn load_test_suite(&self, path: &Path) -> Result<TestSuite> {
        let content = std::fs::read_to_string(path)?;
        let suite: TestSuite = toml::from_str(&content)?;
        validate_test_suite(&suite)?;
        Ok(suite)
    }

    /// @ai:intent Parse and validate a benchmark suite file
    /// @ai:effects fs:read
    fn load_benchmark_suite(&self, path: &Path) -> Result<BenchmarkSuite> {
        let content = std::fs::read_to_string(path)?;
        let suite: BenchmarkSuite = toml::from_str(&content)?;
        validate_benchmark_suite(&suite)?;
        Ok(suite)
    }

    /// @ai:intent Load all test suites, skipping files that fail to parse or validate
    /// @ai:effects fs:read
    fn load_test_suites(&self, dir: &Path) -> Result<Vec<TestSuite>> {
        let files = Self::find_suite_files(dir);
        let mut suites = Vec::with_capacity(files.len());

        for path in files {
            match self.load_test_suite(&path) {
                Ok(suite) => suites.push(suite),
                Err(e) => {
                    tracing::warn!("Skipping invalid suite file {}: {}", path.display(), e);
                }
            }
        }

        suites.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(suites)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    const VALID_SUITE: &str = r#"
name = "zeta"
prompt = "summarize"

[[tests]]
name = "non-empty"

[[tests.assertions]]
type = "not_empty"
"#;

    #[test]
    fn test_load_single_suite() {
        let temp = TempDir::new().unwrap();
        let path = write_file(temp.path(), "suite.toml", VALID_SUITE);

        let suite = SuiteLoader::new().load_test_suite(&path).unwrap();
        assert_eq!(suite.name, "zeta");
        assert_eq!(suite.tests.len(), 1);
    }

    #[test]
    fn test_load_rejects_invalid_suite() {
        let temp = TempDir::new().unwrap();
        let path = write_file(
            temp.path(),
            "bad.toml",
            "name = \"bad\"\nprompt = \"p\"\n\n[[tests]]\nname = \"no assertions\"\n",
        );

        let err = SuiteLoader::new().load_test_suite(&path).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_load_dir_skips_invalid_and_sorts() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "b.toml", VALID_SUITE);
        write_file(
            temp.path(),
            "nested/a.toml",
            &VALID_SUITE.replace("zeta", "alpha"),
        );
        write_file(temp.path(), "broken.toml", "name = ");
        write_file(temp.path(), "notes.md", "# not a suite");

        let suites = SuiteLoader::new().load_test_suites(temp.path()).unwrap();
        let names: Vec<_> = suites.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_load_benchmark_suite() {
        let temp = TempDir::new().unwrap();
        let path = write_file(
            temp.path(),
            "bench.toml",
            r#"
name = "latency"
prompt = "summarize"
models = ["gpt-4o-mini", "claude-3-5-haiku-20241022"]
runs_per_model = 5

[variables]
topic = "rust"
"#,
        );

        let suite = SuiteLoader::new().load_benchmark_suite(&path).unwrap();
        assert_eq!(suite.models.len(), 2);
        assert_eq!(suite.iterations(), 5);
        assert_eq!(suite.variables.len(), 1);
    }

    #[test]
    fn test_load_any_detects_kind() {
        let temp = TempDir::new().unwrap();
        let test_path = write_file(temp.path(), "suite.toml", VALID_SUITE);
        let bench_path = write_file(
            temp.path(),
            "bench.toml",
            "name = \"b\"\nprompt = \"p\"\nmodels = [\"mock\"]\n",
        );
        let bad_bench = write_file(
            temp.path(),
            "bad_bench.toml",
            "name = \"b\"\nprompt = \"p\"\nmodels = []\n",
        );

        let loader = SuiteLoader::new();
        assert!(matches!(loader.load_any(&test_path), Ok(SuiteFile::Test(_))));

        let bench = loader.load_any(&bench_path).unwrap();
        assert!(matches!(bench, SuiteFile::Benchmark(_)));
        assert_eq!(bench.name(), "b");

        assert!(matches!(loader.load_any(&bad_bench), Err(Error::Validation(_))));
    }
}
