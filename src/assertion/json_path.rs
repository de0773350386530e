//! @ai:module:intent Dot-path queries over parsed JSON documents
//! @ai:module:layer domain
//! @ai:module:public_api query, value_to_string
//! @ai:module:stateless true

use crate::value::Value;
use serde_json::Value as Json;

/// @ai:intent Look up a dot-separated path in a JSON document
/// @ai:pre path segments are object keys or array indices (`data.items.0.id`);
///         `$.` prefixes, `[n]` indices and `\.` escapes are accepted
/// @ai:post None when any segment does not resolve
/// @ai:effects pure
pub fn query<'a>(doc: &'a Json, path: &str) -> Option<&'a Json> {
    let segments = split_path(path);
    let mut current = doc;

    for segment in &segments {
        current = match current {
            Json::Object(map) => map.get(segment.as_str())?,
            Json::Array(items) => {
                let index: usize = segment.parse().ok()?;
                items.get(index)?
            }
            _ => return None,
        };
    }

    Some(current)
}

/// @ai:intent String form of a queried JSON value
/// @ai:post strings are unquoted, null is empty, containers are compact JSON
/// @ai:effects pure
pub fn value_to_string(value: &Json) -> String {
    match value {
        Json::String(s) => s.clone(),
        Json::Null => String::new(),
        Json::Bool(b) => b.to_string(),
        Json::Number(n) => number_to_string(n),
        Json::Array(_) | Json::Object(_) => value.to_string(),
    }
}

/// Integers print as-is; floats follow the crate-wide rule (`2.0` -> `2`)
fn number_to_string(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    n.as_f64()
        .map(|f| Value::Float(f).to_string())
        .unwrap_or_else(|| n.to_string())
}

fn split_path(path: &str) -> Vec<String> {
    let trimmed = path.trim();
    let trimmed = trimmed
        .strip_prefix("$.")
        .or_else(|| trimmed.strip_prefix('$'))
        .unwrap_or(trimmed);

    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = trimmed.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            '.' => push_segment(&mut segments, &mut current),
            '[' => {
                push_segment(&mut segments, &mut current);
                for inner in chars.by_ref() {
                    if inner == ']' {
                        break;
                    }
                    current.push(inner);
                }
                push_segment(&mut segments, &mut current);
            }
            _ => current.push(c),
        }
    }

    push_segment(&mut segments, &mut current);
    segments
}

fn push_segment(segments: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        segments.push(std::mem::take(current));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_object_and_array() {
        let doc = json!({"data": {"items": [{"id": "1"}, {"id": 2}]}});
        assert_eq!(query(&doc, "data.items.0.id"), Some(&json!("1")));
        assert_eq!(query(&doc, "data.items.1.id"), Some(&json!(2)));
    }

    #[test]
    fn test_bracket_and_dollar_forms() {
        let doc = json!({"data": {"items": [{"id": "1"}]}});
        assert_eq!(query(&doc, "$.data.items[0].id"), Some(&json!("1")));
    }

    #[test]
    fn test_missing_segments() {
        let doc = json!({"a": [1, 2]});
        assert!(query(&doc, "a.5").is_none());
        assert!(query(&doc, "a.x").is_none());
        assert!(query(&doc, "b").is_none());
        assert!(query(&doc, "a.0.deeper").is_none());
    }

    #[test]
    fn test_escaped_dot_in_key() {
        let doc = json!({"v1.2": {"ok": true}});
        assert_eq!(query(&doc, "v1\\.2.ok"), Some(&json!(true)));
    }

    #[test]
    fn test_explicit_null_exists() {
        let doc = json!({"a": null});
        assert_eq!(query(&doc, "a"), Some(&Json::Null));
    }

    #[test]
    fn test_value_to_string() {
        assert_eq!(value_to_string(&json!("x")), "x");
        assert_eq!(value_to_string(&json!(3)), "3");
        assert_eq!(value_to_string(&json!(false)), "false");
        assert_eq!(value_to_string(&Json::Null), "");
        assert_eq!(value_to_string(&json!({"k": [1]})), "{\"k\":[1]}");
    }

    #[test]
    fn test_integral_float_prints_without_decimal() {
        assert_eq!(value_to_string(&json!(2.0)), "2");
        assert_eq!(value_to_string(&json!(-4.0)), "-4");
        assert_eq!(value_to_string(&json!(2.5)), "2.5");
        assert_eq!(value_to_string(&json!(u64::MAX)), u64::MAX.to_string());
    }
}
