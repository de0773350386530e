//! @ai:module:intent Tagged value for template variables and assertion comparisons
//! @ai:module:layer domain
//! @ai:module:public_api Value, Bindings
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// @ai:intent A loosely-typed value as it arrives from a suite definition
///
/// Stringification is canonical per tag:
/// - `String` prints as-is
/// - `Int` prints in decimal
/// - `Float` with an integral value prints without a decimal point (`3.0` -> `3`),
///   other floats use their shortest round-trip form (`0.7`)
/// - `Bool` prints `true` / `false`
/// - `Null` prints the empty string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Null,
}

/// Variable bindings keyed by name, ordered for reproducible output
pub type Bindings = BTreeMap<String, Value>;

impl Value {
    /// @ai:intent Interpret the value as a non-negative count
    /// @ai:effects pure
    pub fn as_count(&self) -> Option<usize> {
        match self {
            Value::Int(n) if *n >= 0 => Some(*n as usize),
            Value::Float(f) if f.is_finite() && *f >= 0.0 && f.fract() == 0.0 => {
                Some(*f as usize)
            }
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{:.0}", x),
            Value::Float(x) => write!(f, "{}", x),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Null => Ok(()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_float_prints_without_decimal_point() {
        assert_eq!(Value::Float(3.0).to_string(), "3");
        assert_eq!(Value::Float(-12.0).to_string(), "-12");
    }

    #[test]
    fn test_fractional_float_uses_natural_form() {
        assert_eq!(Value::Float(0.7).to_string(), "0.7");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
    }

    #[test]
    fn test_other_tags() {
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::from("hi").to_string(), "hi");
    }

    #[test]
    fn test_untagged_deserialize_from_toml() {
        #[derive(Deserialize)]
        struct Doc {
            a: Value,
            b: Value,
            c: Value,
            d: Value,
        }

        let doc: Doc = toml::from_str("a = \"x\"\nb = 3\nc = 1.5\nd = false").unwrap();
        assert_eq!(doc.a, Value::String("x".to_string()));
        assert_eq!(doc.b, Value::Int(3));
        assert_eq!(doc.c, Value::Float(1.5));
        assert_eq!(doc.d, Value::Bool(false));
    }

    #[test]
    fn test_as_count() {
        assert_eq!(Value::Int(5).as_count(), Some(5));
        assert_eq!(Value::Float(5.0).as_count(), Some(5));
        assert_eq!(Value::from("7").as_count(), Some(7));
        assert_eq!(Value::Float(2.5).as_count(), None);
        assert_eq!(Value::Int(-1).as_count(), None);
        assert_eq!(Value::Null.as_count(), None);
    }
}
