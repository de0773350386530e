//! @ai:module:intent Structural validation of suite definitions before execution
//! @ai:module:layer domain
//! @ai:module:public_api validate_test_suite, validate_benchmark_suite
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::suite::types::{Assertion, AssertionKind, BenchmarkSuite, TestSuite};
use std::collections::HashSet;

/// @ai:intent Check a test suite against the definition rules
/// @ai:post Ok means every non-skipped case has a name and well-formed assertions
/// @ai:post Ok means no two cases share a name (snapshot baselines are keyed by it)
/// @ai:effects pure
pub fn validate_test_suite(suite: &TestSuite) -> Result<()> {
    require_non_blank(&suite.name, "name")?;
    require_non_blank(&suite.prompt, "prompt")?;

    if suite.tests.is_empty() {
        return Err(invalid("tests: at least one test case is required"));
    }

    let mut seen = HashSet::new();

    for (i, case) in suite.tests.iter().enumerate() {
        let name = case.name.trim();
        if !name.is_empty() && !seen.insert(name) {
            return Err(invalid(format!(
                "tests[{}].name: duplicate test name '{}'",
                i, name
            )));
        }

        if case.skip {
            continue;
        }

        require_non_blank(&case.name, &format!("tests[{}].name", i))?;

        if case.assertions.is_empty() {
            return Err(invalid(format!(
                "tests[{}].assertions: at least one assertion is required",
                i
            )));
        }

        for (j, assertion) in case.assertions.iter().enumerate() {
            validate_assertion(assertion, &format!("tests[{}].assertions[{}]", i, j))?;
        }
    }

    Ok(())
}

/// @ai:intent Check a benchmark suite against the definition rules
/// @ai:effects pure
pub fn validate_benchmark_suite(suite: &BenchmarkSuite) -> Result<()> {
    require_non_blank(&suite.name, "name")?;
    require_non_blank(&suite.prompt, "prompt")?;

    if suite.models.is_empty() {
        return Err(invalid("models: at least one model is required"));
    }

    if let Some(i) = suite.models.iter().position(|m| m.trim().is_empty()) {
        return Err(invalid(format!("models[{}]: model id must not be empty", i)));
    }

    if suite.runs_per_model == Some(0) {
        return Err(invalid("runs_per_model: must be at least 1"));
    }

    Ok(())
}

fn validate_assertion(assertion: &Assertion, field: &str) -> Result<()> {
    if !assertion.kind.is_known() {
        return Err(invalid(format!(
            "{}.type: unknown assertion type '{}'",
            field, assertion.kind
        )));
    }

    let has_value = assertion.value.as_ref().map(|v| !v.is_null()).unwrap_or(false);

    if assertion.kind.requires_value() && !has_value {
        return Err(invalid(format!(
            "{}.value: required for '{}' assertions",
            field, assertion.kind
        )));
    }

    if assertion.kind == AssertionKind::JsonPath
        && assertion.path.as_deref().map(str::trim).unwrap_or("").is_empty()
    {
        return Err(invalid(format!(
            "{}.path: required for 'json_path' assertions",
            field
        )));
    }

    Ok(())
}

fn require_non_blank(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(invalid(format!("{}: required field is missing", field)))
    } else {
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::Validation(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::types::TestCase;

    fn suite_with(tests: Vec<TestCase>) -> TestSuite {
        TestSuite {
            name: "suite".to_string(),
            prompt: "prompt".to_string(),
            version: None,
            tests,
        }
    }

    fn case(name: &str, assertions: Vec<Assertion>) -> TestCase {
        TestCase {
            name: name.to_string(),
            assertions,
            ..Default::default()
        }
    }

    fn expect_validation(result: Result<()>, needle: &str) {
        match result {
            Err(Error::Validation(msg)) => assert!(msg.contains(needle), "message was: {}", msg),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_suite_passes() {
        let suite = suite_with(vec![case(
            "ok",
            vec![Assertion::new(AssertionKind::Contains).with_value("hi")],
        )]);
        assert!(validate_test_suite(&suite).is_ok());
    }

    #[test]
    fn test_missing_prompt_rejected() {
        let mut suite = suite_with(vec![case("ok", vec![Assertion::new(AssertionKind::NotEmpty)])]);
        suite.prompt = "  ".to_string();
        expect_validation(validate_test_suite(&suite), "prompt");
    }

    #[test]
    fn test_empty_tests_rejected() {
        expect_validation(validate_test_suite(&suite_with(vec![])), "tests");
    }

    #[test]
    fn test_skipped_case_needs_no_name_or_assertions() {
        let skipped = TestCase {
            skip: true,
            ..Default::default()
        };
        assert!(validate_test_suite(&suite_with(vec![skipped])).is_ok());
    }

    #[test]
    fn test_duplicate_test_names_rejected() {
        let suite = suite_with(vec![
            case("greets", vec![Assertion::new(AssertionKind::NotEmpty)]),
            case("other", vec![Assertion::new(AssertionKind::NotEmpty)]),
            case("greets", vec![Assertion::new(AssertionKind::NotEmpty)]),
        ]);
        expect_validation(
            validate_test_suite(&suite),
            "tests[2].name: duplicate test name 'greets'",
        );
    }

    #[test]
    fn test_contains_without_value_rejected() {
        let suite = suite_with(vec![case("c", vec![Assertion::new(AssertionKind::Contains)])]);
        expect_validation(validate_test_suite(&suite), "tests[0].assertions[0].value");
    }

    #[test]
    fn test_json_path_without_path_rejected() {
        let suite = suite_with(vec![case("j", vec![Assertion::new(AssertionKind::JsonPath)])]);
        expect_validation(validate_test_suite(&suite), "path");
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let suite = suite_with(vec![case(
            "u",
            vec![Assertion::new(AssertionKind::Unknown("fuzzy".to_string()))],
        )]);
        expect_validation(validate_test_suite(&suite), "unknown assertion type 'fuzzy'");
    }

    #[test]
    fn test_benchmark_rules() {
        let mut suite = BenchmarkSuite {
            name: "b".to_string(),
            prompt: "p".to_string(),
            version: None,
            models: vec![],
            runs_per_model: None,
            variables: Default::default(),
        };
        expect_validation(validate_benchmark_suite(&suite), "models");

        suite.models = vec!["gpt-4o".to_string(), " ".to_string()];
        expect_validation(validate_benchmark_suite(&suite), "models[1]");

        suite.models = vec!["gpt-4o".to_string()];
        assert!(validate_benchmark_suite(&suite).is_ok());
    }
}
