//! @ai:module:intent Evaluate a single assertion against generated output
//! @ai:module:layer domain
//! @ai:module:public_api evaluate, AssertionResult
//! @ai:module:stateless true

use crate::assertion::json_path;
use crate::error::Error;
use crate::suite::{Assertion, AssertionKind};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// @ai:intent Outcome of one assertion evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssertionResult {
    #[serde(rename = "type")]
    pub kind: AssertionKind,
    pub passed: bool,
    pub expected: String,
    pub actual: String,
    pub message: String,
}

/// @ai:intent Evaluate an assertion against the actual output text
/// @ai:post never panics; malformed assertion input yields a failed result
/// @ai:effects pure
pub fn evaluate(assertion: &Assertion, actual: &str) -> AssertionResult {
    let expected = assertion.value_string();

    let outcome = match &assertion.kind {
        AssertionKind::Contains => check(
            actual.contains(&expected),
            actual,
            format!("expected output to contain \"{}\"", expected),
        ),
        AssertionKind::NotContains => check(
            !actual.contains(&expected),
            actual,
            format!("expected output not to contain \"{}\"", expected),
        ),
        AssertionKind::Equals => {
            let got = actual.trim();
            check(
                got == expected.trim(),
                got,
                format!("expected \"{}\", got \"{}\"", expected.trim(), got),
            )
        }
        AssertionKind::Matches => eval_matches(&expected, actual),
        AssertionKind::StartsWith => {
            let got = actual.trim();
            check(
                got.starts_with(&expected),
                got,
                format!("expected output to start with \"{}\"", expected),
            )
        }
        AssertionKind::EndsWith => {
            let got = actual.trim();
            check(
                got.ends_with(&expected),
                got,
                format!("expected output to end with \"{}\"", expected),
            )
        }
        AssertionKind::MinLength => eval_count(assertion, actual.chars().count(), Bound::Min, "length"),
        AssertionKind::MaxLength => eval_count(assertion, actual.chars().count(), Bound::Max, "length"),
        AssertionKind::NotEmpty => check(
            !actual.trim().is_empty(),
            actual,
            "expected non-empty output".to_string(),
        ),
        AssertionKind::JsonValid => match serde_json::from_str::<serde_json::Value>(actual) {
            Ok(_) => Outcome::pass(actual),
            Err(e) => Outcome::fail(actual, format!("invalid JSON: {}", e)),
        },
        AssertionKind::JsonPath => eval_json_path(assertion, actual),
        AssertionKind::LineCount => eval_count(assertion, line_count(actual), Bound::Exact, "line count"),
        AssertionKind::MinLines => eval_count(assertion, line_count(actual), Bound::Min, "line count"),
        AssertionKind::MaxLines => eval_count(assertion, line_count(actual), Bound::Max, "line count"),
        AssertionKind::WordCount => {
            eval_count(assertion, actual.split_whitespace().count(), Bound::Exact, "word count")
        }
        AssertionKind::Snapshot => eval_snapshot(assertion, actual),
        AssertionKind::Sentiment | AssertionKind::Language => Outcome {
            passed: true,
            actual: actual.to_string(),
            message: format!("assertion type '{}' not yet implemented", assertion.kind),
        },
        AssertionKind::Unknown(name) => {
            Outcome::fail(actual, format!("unknown assertion type: {}", name))
        }
    };

    let message = match (&assertion.message, outcome.passed) {
        (Some(custom), false) => custom.clone(),
        _ => outcome.message,
    };

    AssertionResult {
        kind: assertion.kind.clone(),
        passed: outcome.passed,
        expected,
        actual: outcome.actual,
        message,
    }
}

/// @ai:intent Count lines, ignoring one trailing empty element from a final newline
/// @ai:effects pure
pub fn line_count(text: &str) -> usize {
    let mut lines: Vec<&str> = text.split('\n').collect();

    if lines.last() == Some(&"") {
        lines.pop();
    }

    lines.len()
}

struct Outcome {
    passed: bool,
    actual: String,
    message: String,
}

impl Outcome {
    fn pass(actual: impl Into<String>) -> Self {
        Self {
            passed: true,
            actual: actual.into(),
            message: String::new(),
        }
    }

    fn fail(actual: impl Into<String>, message: String) -> Self {
        Self {
            passed: false,
            actual: actual.into(),
            message,
        }
    }
}

fn check(passed: bool, actual: &str, failure: String) -> Outcome {
    if passed {
        Outcome::pass(actual)
    } else {
        Outcome::fail(actual, failure)
    }
}

#[derive(Clone, Copy)]
enum Bound {
    Min,
    Max,
    Exact,
}

fn eval_matches(pattern: &str, actual: &str) -> Outcome {
    match Regex::new(pattern) {
        Ok(re) => check(
            re.is_match(actual),
            actual,
            format!("output does not match pattern /{}/", pattern),
        ),
        Err(e) => {
            let err = Error::AssertionConfig(format!("invalid pattern /{}/: {}", pattern, e));
            Outcome::fail(actual, err.to_string())
        }
    }
}

fn eval_count(assertion: &Assertion, measured: usize, bound: Bound, what: &str) -> Outcome {
    let limit = match assertion.value.as_ref().and_then(|v| v.as_count()) {
        Some(limit) => limit,
        None => {
            let err = Error::AssertionConfig(format!(
                "'{}' requires a non-negative integer value, got \"{}\"",
                assertion.kind,
                assertion.value_string()
            ));
            return Outcome::fail(measured.to_string(), err.to_string());
        }
    };

    let (passed, relation) = match bound {
        Bound::Min => (measured >= limit, "at least"),
        Bound::Max => (measured <= limit, "at most"),
        Bound::Exact => (measured == limit, "exactly"),
    };

    check(
        passed,
        &measured.to_string(),
        format!("expected {} {} {}, got {}", what, relation, limit, measured),
    )
}

fn eval_json_path(assertion: &Assertion, actual: &str) -> Outcome {
    let doc: serde_json::Value = match serde_json::from_str(actual) {
        Ok(doc) => doc,
        Err(e) => return Outcome::fail(actual, format!("output is not valid JSON: {}", e)),
    };

    let path = assertion.path.as_deref().unwrap_or("");

    let found = match json_path::query(&doc, path) {
        Some(found) => json_path::value_to_string(found),
        None => return Outcome::fail("", format!("path '{}' not found", path)),
    };

    match assertion.value.as_ref().filter(|v| !v.is_null()) {
        None => Outcome::pass(found),
        Some(expected) => {
            let expected = expected.to_string();
            let message = format!("path '{}' is \"{}\", expected \"{}\"", path, found, expected);
            let passed = found == expected;
            check(passed, &found, message)
        }
    }
}

fn eval_snapshot(assertion: &Assertion, actual: &str) -> Outcome {
    let got = actual.trim();

    match assertion.value.as_ref().filter(|v| !v.is_null()) {
        None => Outcome::fail(
            got,
            "no snapshot stored; run with snapshot update enabled to record one".to_string(),
        ),
        Some(baseline) => {
            let baseline = baseline.to_string();
            check(
                got == baseline.trim(),
                got,
                "output differs from stored snapshot".to_string(),
            )
        }
    }
}
