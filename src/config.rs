//! @ai:module:intent Configuration structs for the evaluation engine
//! @ai:module:layer infrastructure
//! @ai:module:public_api EngineConfig, ApiConfig, RunConfig, PathConfig, TestFilter
//! @ai:module:stateless true

use crate::provider::ModelPrice;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Configuration file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "prompt-bench.toml";

/// @ai:intent Main configuration for the engine
/// @ai:effects pure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub paths: PathConfig,
    /// Extra or overriding entries merged into the built-in price table
    #[serde(default)]
    pub pricing: BTreeMap<String, ModelPrice>,
}

/// @ai:intent Vendor endpoint and transport configuration
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_anthropic_url")]
    pub anthropic_base_url: String,
    #[serde(default = "default_openai_url")]
    pub openai_base_url: String,
    #[serde(default = "default_rate_limit")]
    pub requests_per_minute: u32,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// @ai:intent Run configuration for test and benchmark execution
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_runs_per_model")]
    pub runs_per_model: u32,
    /// Execute tests through a provider instead of the echo executor
    #[serde(default)]
    pub live: bool,
    /// Model used for live test execution
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub update_snapshots: bool,
    #[serde(default)]
    pub filter: TestFilter,
}

/// @ai:intent Path configuration for input/output directories
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathConfig {
    #[serde(default = "default_prompts_dir")]
    pub prompts_dir: PathBuf,
    #[serde(default = "default_suites_dir")]
    pub suites_dir: PathBuf,
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
    #[serde(default = "default_snapshots_dir")]
    pub snapshots_dir: PathBuf,
}

/// @ai:intent Filter configuration for selecting test cases
/// @ai:effects pure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestFilter {
    pub tags: Option<Vec<String>>,
    pub names: Option<Vec<String>>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            anthropic_base_url: default_anthropic_url(),
            openai_base_url: default_openai_url(),
            requests_per_minute: default_rate_limit(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            runs_per_model: default_runs_per_model(),
            live: false,
            model: default_model(),
            update_snapshots: false,
            filter: TestFilter::default(),
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            prompts_dir: default_prompts_dir(),
            suites_dir: default_suites_dir(),
            results_dir: default_results_dir(),
            snapshots_dir: default_snapshots_dir(),
        }
    }
}

fn default_anthropic_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_openai_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_rate_limit() -> u32 {
    60
}

fn default_timeout() -> u64 {
    120
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.7
}

fn default_runs_per_model() -> u32 {
    3
}

fn default_model() -> String {
    "mock".to_string()
}

fn default_prompts_dir() -> PathBuf {
    PathBuf::from("prompts")
}

fn default_suites_dir() -> PathBuf {
    PathBuf::from("suites")
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_snapshots_dir() -> PathBuf {
    PathBuf::from(".snapshots")
}

impl EngineConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// @ai:intent Load the given file, else the default file when present, else defaults
    /// @ai:effects fs:read
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        Ok(())
    }
}

impl TestFilter {
    /// @ai:intent Build a filter from comma-separated CLI values
    /// @ai:effects pure
    pub fn from_lists(tags: Option<&str>, names: Option<&str>) -> Self {
        Self {
            tags: tags.map(split_list),
            names: names.map(split_list),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tags.as_ref().map_or(true, |t| t.is_empty())
            && self.names.as_ref().map_or(true, |n| n.is_empty())
    }

    /// @ai:intent Check if filter selects a test case
    /// @ai:post a case matches when it carries any listed tag and its name is listed
    /// @ai:effects pure
    pub fn matches(&self, name: &str, tags: &[String]) -> bool {
        let tag_match = self
            .tags
            .as_ref()
            .filter(|wanted| !wanted.is_empty())
            .map(|wanted| wanted.iter().any(|tag| tags.contains(tag)))
            .unwrap_or(true);

        let name_match = self
            .names
            .as_ref()
            .filter(|wanted| !wanted.is_empty())
            .map(|wanted| wanted.iter().any(|n| n == name))
            .unwrap_or(true);

        tag_match && name_match
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_filter_matches_all_when_empty() {
        let filter = TestFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches("greets", &[]));
    }

    #[test]
    fn test_filter_matches_tags() {
        let filter = TestFilter::from_lists(Some("smoke, fast"), None);
        assert!(filter.matches("a", &tags(&["fast"])));
        assert!(!filter.matches("a", &tags(&["slow"])));
        assert!(!filter.matches("a", &[]));
    }

    #[test]
    fn test_filter_matches_multiple_criteria() {
        let filter = TestFilter {
            tags: Some(tags(&["smoke"])),
            names: Some(tags(&["greets", "farewell"])),
        };
        assert!(filter.matches("greets", &tags(&["smoke"])));
        assert!(!filter.matches("other", &tags(&["smoke"])));
        assert!(!filter.matches("greets", &tags(&["slow"])));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            [run]
            runs_per_model = 5

            [pricing."my-model"]
            input = 1.0
            output = 2.0
            "#,
        )
        .unwrap();

        assert_eq!(config.run.runs_per_model, 5);
        assert_eq!(config.run.max_tokens, 1024);
        assert_eq!(config.api.requests_per_minute, 60);
        assert_eq!(config.pricing["my-model"], ModelPrice::new(1.0, 2.0));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prompt-bench.toml");

        let mut config = EngineConfig::default();
        config.run.live = true;
        config.run.filter.tags = Some(tags(&["smoke"]));
        config.save(&path).unwrap();

        let loaded = EngineConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
