//! @ai:module:intent Define error types for the evaluation and benchmarking engine
//! @ai:module:layer domain
//! @ai:module:public_api Error, Result
//! @ai:module:stateless true

use thiserror::Error;

/// @ai:intent Unified error type for all engine operations
#[derive(Error, Debug)]
pub enum Error {
    /// Suite definition is missing a required field or has no usable entries
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{}", not_found_message(.name, .version.as_deref()))]
    NotFound {
        name: String,
        version: Option<String>,
    },

    /// No adapter bound for the vendor inferred from a model id
    #[error("No provider registered for model '{model}' (vendor '{vendor}')")]
    NotRegistered { model: String, vendor: String },

    #[error("Template render error: {0}")]
    Render(String),

    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Invalid assertion: {0}")]
    AssertionConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

fn not_found_message(name: &str, version: Option<&str>) -> String {
    match version {
        Some(v) => format!("Prompt '{}' version '{}' not found", name, v),
        None => format!("Prompt '{}' not found", name),
    }
}

impl Error {
    /// @ai:intent Build a not-found error for a target and optional version reference
    /// @ai:effects pure
    pub fn not_found(name: &str, version: Option<&str>) -> Self {
        Error::NotFound {
            name: name.to_string(),
            version: version.map(str::to_string),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_with_version() {
        let err = Error::not_found("greeting", Some("v3"));
        assert_eq!(err.to_string(), "Prompt 'greeting' version 'v3' not found");
    }

    #[test]
    fn test_not_registered_names_model_and_vendor() {
        let err = Error::NotRegistered {
            model: "gpt-4o".to_string(),
            vendor: "openai".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("gpt-4o"));
        assert!(msg.contains("openai"));
    }
}
