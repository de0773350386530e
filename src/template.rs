//! @ai:module:intent Substitute `{{name}}` placeholders in prompt templates
//! @ai:module:layer domain
//! @ai:module:public_api render, NO_VALUE
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::value::{Bindings, Value};

/// Rendered in place of a referenced variable that has no binding
pub const NO_VALUE: &str = "<no value>";

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// @ai:intent Render a template against variable bindings
/// @ai:pre placeholders are `{{name}}`, `{{ name }}` or `{{.name}}`
/// @ai:post unbound variables render as NO_VALUE; malformed actions fail with Error::Render
/// @ai:effects pure
pub fn render(template: &str, bindings: &Bindings) -> Result<String> {
    if bindings.is_empty() {
        return Ok(template.to_string());
    }

    let mut output = String::with_capacity(template.len());
    let mut rest = template;
    let mut line = 1;

    while let Some(start) = rest.find(OPEN) {
        let (text, tail) = rest.split_at(start);
        output.push_str(text);
        line += text.matches('\n').count();

        let after_open = &tail[OPEN.len()..];
        let end = after_open.find(CLOSE).ok_or_else(|| {
            Error::Render(format!("line {}: unclosed action", line))
        })?;

        let action = &after_open[..end];
        let name = parse_action(action).map_err(|msg| {
            Error::Render(format!("line {}: {}", line, msg))
        })?;

        match bindings.get(name) {
            Some(Value::Null) | None => output.push_str(NO_VALUE),
            Some(value) => output.push_str(&value.to_string()),
        }

        line += action.matches('\n').count();
        rest = &after_open[end + CLOSE.len()..];
    }

    output.push_str(rest);
    Ok(output)
}

/// @ai:intent Extract the variable name from the inside of an action
/// @ai:effects pure
fn parse_action(action: &str) -> std::result::Result<&str, String> {
    let trimmed = action.trim();

    if trimmed.is_empty() {
        return Err("missing value for command".to_string());
    }

    let name = trimmed.strip_prefix('.').unwrap_or(trimmed);

    if is_identifier(name) {
        Ok(name)
    } else {
        Err(format!("unexpected \"{}\" in action", trimmed))
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();

    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }

    chars.all(|c| c.is_alphanumeric() || c == '_')
}
