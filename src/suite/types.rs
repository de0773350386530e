//! @ai:module:intent Suite, test case and assertion definitions
//! @ai:module:layer domain
//! @ai:module:public_api TestSuite, TestCase, Assertion, AssertionKind, BenchmarkSuite
//! @ai:module:stateless true

use crate::value::{Bindings, Value};
use serde::{Deserialize, Serialize};

/// Iterations per model when a benchmark suite leaves `runs_per_model` unset
pub const DEFAULT_RUNS_PER_MODEL: u32 = 3;

/// @ai:intent Kind of check applied to generated output
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssertionKind {
    Contains,
    NotContains,
    Equals,
    Matches,
    StartsWith,
    EndsWith,
    MinLength,
    MaxLength,
    NotEmpty,
    JsonValid,
    JsonPath,
    LineCount,
    MinLines,
    MaxLines,
    WordCount,
    Snapshot,
    Sentiment,
    Language,
    /// Kept verbatim so the evaluator can report it instead of failing the load
    Unknown(String),
}

impl AssertionKind {
    /// @ai:intent Convert kind to its suite-file name
    /// @ai:effects pure
    pub fn as_str(&self) -> &str {
        match self {
            AssertionKind::Contains => "contains",
            AssertionKind::NotContains => "not_contains",
            AssertionKind::Equals => "equals",
            AssertionKind::Matches => "matches",
            AssertionKind::StartsWith => "starts_with",
            AssertionKind::EndsWith => "ends_with",
            AssertionKind::MinLength => "min_length",
            AssertionKind::MaxLength => "max_length",
            AssertionKind::NotEmpty => "not_empty",
            AssertionKind::JsonValid => "json_valid",
            AssertionKind::JsonPath => "json_path",
            AssertionKind::LineCount => "line_count",
            AssertionKind::MinLines => "min_lines",
            AssertionKind::MaxLines => "max_lines",
            AssertionKind::WordCount => "word_count",
            AssertionKind::Snapshot => "snapshot",
            AssertionKind::Sentiment => "sentiment",
            AssertionKind::Language => "language",
            AssertionKind::Unknown(name) => name,
        }
    }

    /// @ai:intent Whether this kind compares against a `value`
    /// @ai:effects pure
    pub fn requires_value(&self) -> bool {
        matches!(
            self,
            AssertionKind::Contains
                | AssertionKind::NotContains
                | AssertionKind::Equals
                | AssertionKind::Matches
                | AssertionKind::StartsWith
                | AssertionKind::EndsWith
                | AssertionKind::MinLength
                | AssertionKind::MaxLength
                | AssertionKind::LineCount
                | AssertionKind::MinLines
                | AssertionKind::MaxLines
                | AssertionKind::WordCount
        )
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, AssertionKind::Unknown(_))
    }
}

impl From<String> for AssertionKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "contains" => AssertionKind::Contains,
            "not_contains" => AssertionKind::NotContains,
            "equals" => AssertionKind::Equals,
            "matches" => AssertionKind::Matches,
            "starts_with" => AssertionKind::StartsWith,
            "ends_with" => AssertionKind::EndsWith,
            "min_length" => AssertionKind::MinLength,
            "max_length" => AssertionKind::MaxLength,
            "not_empty" => AssertionKind::NotEmpty,
            "json_valid" => AssertionKind::JsonValid,
            "json_path" => AssertionKind::JsonPath,
            "line_count" => AssertionKind::LineCount,
            "min_lines" => AssertionKind::MinLines,
            "max_lines" => AssertionKind::MaxLines,
            "word_count" => AssertionKind::WordCount,
            "snapshot" => AssertionKind::Snapshot,
            "sentiment" => AssertionKind::Sentiment,
            "language" => AssertionKind::Language,
            _ => AssertionKind::Unknown(name),
        }
    }
}

impl From<AssertionKind> for String {
    fn from(kind: AssertionKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for AssertionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @ai:intent A declarative check applied to generated output
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assertion {
    #[serde(rename = "type")]
    pub kind: AssertionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Query path for `json_path` (e.g. `data.items.0.id`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Replaces the generated diagnostic when the assertion fails
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Assertion {
    /// @ai:intent Create an assertion of the given kind with no value
    /// @ai:effects pure
    pub fn new(kind: AssertionKind) -> Self {
        Self {
            kind,
            value: None,
            path: None,
            message: None,
        }
    }

    /// @ai:intent Builder: set the comparison value
    /// @ai:effects pure
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// @ai:intent Builder: set the query path
    /// @ai:effects pure
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// @ai:intent Builder: set the custom failure message
    /// @ai:effects pure
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// @ai:intent Comparison value in its canonical string form (empty when absent)
    /// @ai:effects pure
    pub fn value_string(&self) -> String {
        self.value.as_ref().map(|v| v.to_string()).unwrap_or_default()
    }
}

/// @ai:intent One test case inside a suite
/// @ai:effects pure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub inputs: Bindings,
    #[serde(default)]
    pub assertions: Vec<Assertion>,
    #[serde(default)]
    pub skip: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Inline snapshot baseline, used when the snapshot store has none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<String>,
}

/// @ai:intent A named, ordered collection of test cases against one prompt
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSuite {
    pub name: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub tests: Vec<TestCase>,
}

/// @ai:intent A benchmark definition: one prompt across several models
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSuite {
    pub name: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub models: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runs_per_model: Option<u32>,
    #[serde(default)]
    pub variables: Bindings,
}

impl BenchmarkSuite {
    /// @ai:intent Iterations per model, defaulting when unset
    /// @ai:effects pure
    pub fn iterations(&self) -> u32 {
        self.runs_per_model.unwrap_or(DEFAULT_RUNS_PER_MODEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_name() {
        for name in ["contains", "json_path", "max_lines", "snapshot", "language"] {
            let kind = AssertionKind::from(name.to_string());
            assert!(kind.is_known());
            assert_eq!(kind.as_str(), name);
        }
    }

    #[test]
    fn test_unknown_kind_is_preserved() {
        let kind = AssertionKind::from("levenshtein".to_string());
        assert_eq!(kind, AssertionKind::Unknown("levenshtein".to_string()));
        assert!(!kind.is_known());
        assert_eq!(kind.to_string(), "levenshtein");
    }

    #[test]
    fn test_parse_test_suite_toml() {
        let content = r#"
name = "greeting"
prompt = "hello-prompt"
version = "v2"

[[tests]]
name = "says hello"
tags = ["smoke"]

[tests.inputs]
name = "World"
count = 3

[[tests.assertions]]
type = "contains"
value = "Hello"

[[tests.assertions]]
type = "json_path"
path = "data.id"
message = "id missing"

[[tests]]
skip = true
"#;
        let suite: TestSuite = toml::from_str(content).unwrap();
        assert_eq!(suite.version.as_deref(), Some("v2"));
        assert_eq!(suite.tests.len(), 2);

        let first = &suite.tests[0];
        assert_eq!(first.inputs.get("count"), Some(&Value::Int(3)));
        assert_eq!(first.assertions[0].kind, AssertionKind::Contains);
        assert_eq!(first.assertions[1].path.as_deref(), Some("data.id"));
        assert!(suite.tests[1].skip);
    }

    #[test]
    fn test_benchmark_iterations_default() {
        let suite: BenchmarkSuite =
            toml::from_str("name = \"b\"\nprompt = \"p\"\nmodels = [\"gpt-4o\"]").unwrap();
        assert_eq!(suite.iterations(), 3);

        let suite = BenchmarkSuite {
            runs_per_model: Some(10),
            ..suite
        };
        assert_eq!(suite.iterations(), 10);
    }
}
