//! @ai:module:intent Resolve a model id to a vendor and then to a registered adapter
//! @ai:module:layer application
//! @ai:module:public_api Registry, VendorRules, UNKNOWN_VENDOR
//! @ai:module:stateless false

use crate::error::{Error, Result};
use crate::provider::Provider;
use std::collections::HashMap;
use std::sync::Arc;

/// Vendor name for model ids no prefix rule matches
pub const UNKNOWN_VENDOR: &str = "unknown";

/// @ai:intent Ordered prefix -> vendor rules, first match wins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorRules {
    rules: Vec<(String, String)>,
}

impl VendorRules {
    /// @ai:intent Build rules from (prefix, vendor) pairs
    /// @ai:pre prefixes are lower-case
    /// @ai:effects pure
    pub fn new(rules: Vec<(String, String)>) -> Self {
        Self { rules }
    }

    /// @ai:intent Infer the vendor for a model id
    /// @ai:effects pure
    pub fn resolve(&self, model: &str) -> &str {
        let model = model.to_lowercase();

        self.rules
            .iter()
            .find(|(prefix, _)| model.starts_with(prefix.as_str()))
            .map(|(_, vendor)| vendor.as_str())
            .unwrap_or(UNKNOWN_VENDOR)
    }
}

impl Default for VendorRules {
    fn default() -> Self {
        let pairs = [
            ("gpt-", "openai"),
            ("chatgpt-", "openai"),
            ("o1", "openai"),
            ("o3", "openai"),
            ("claude", "anthropic"),
            ("mock", "mock"),
        ];

        Self::new(
            pairs
                .iter()
                .map(|(prefix, vendor)| (prefix.to_string(), vendor.to_string()))
                .collect(),
        )
    }
}

/// @ai:intent Vendor name -> adapter bindings
pub struct Registry {
    providers: HashMap<String, Arc<dyn Provider>>,
    rules: Arc<VendorRules>,
}

impl Registry {
    /// @ai:intent Create an empty registry sharing a rule table
    /// @ai:effects pure
    pub fn new(rules: Arc<VendorRules>) -> Self {
        Self {
            providers: HashMap::new(),
            rules,
        }
    }

    /// @ai:intent Bind an adapter under its own name, replacing any previous binding
    /// @ai:effects state:write
    pub fn register(&mut self, provider: Arc<dyn Provider>) {
        let name = provider.name().to_string();
        tracing::debug!("Registering provider {}", name);
        self.providers.insert(name, provider);
    }

    pub fn get(&self, vendor: &str) -> Option<Arc<dyn Provider>> {
        self.providers.get(vendor).cloned()
    }

    /// @ai:intent Infer the vendor for a model id
    /// @ai:effects pure
    pub fn resolve_vendor(&self, model: &str) -> String {
        self.rules.resolve(model).to_string()
    }

    /// @ai:intent Find the adapter that serves a model id
    /// @ai:post Err(NotRegistered) names both the model and the inferred vendor
    /// @ai:effects pure
    pub fn lookup_for_model(&self, model: &str) -> Result<Arc<dyn Provider>> {
        let vendor = self.resolve_vendor(model);

        self.get(&vendor).ok_or_else(|| Error::NotRegistered {
            model: model.to_string(),
            vendor,
        })
    }

    /// @ai:intent Registered vendor names, sorted
    /// @ai:effects pure
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.providers.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(Arc::new(VendorRules::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockProvider;

    #[test]
    fn test_resolve_vendor_prefixes() {
        let rules = VendorRules::default();
        assert_eq!(rules.resolve("gpt-4o-mini"), "openai");
        assert_eq!(rules.resolve("o1-preview"), "openai");
        assert_eq!(rules.resolve("Claude-3-5-Sonnet-20241022"), "anthropic");
        assert_eq!(rules.resolve("mock-fast"), "mock");
        assert_eq!(rules.resolve("llama-3-70b"), UNKNOWN_VENDOR);
    }

    #[test]
    fn test_lookup_for_registered_vendor() {
        let mut registry = Registry::default();
        registry.register(Arc::new(MockProvider::new()));

        let provider = registry.lookup_for_model("mock-model").unwrap();
        assert_eq!(provider.name(), "mock");
        assert_eq!(registry.names(), vec!["mock".to_string()]);
    }

    #[test]
    fn test_lookup_for_unregistered_vendor() {
        let registry = Registry::default();

        match registry.lookup_for_model("gpt-4o") {
            Err(Error::NotRegistered { model, vendor }) => {
                assert_eq!(model, "gpt-4o");
                assert_eq!(vendor, "openai");
            }
            Err(other) => panic!("unexpected error: {:?}", other),
            Ok(_) => panic!("expected lookup to fail"),
        }
    }

    #[test]
    fn test_unknown_vendor_is_not_registered() {
        let registry = Registry::default();
        let err = registry.lookup_for_model("mistral-large").err().unwrap();
        assert!(err.to_string().contains("'unknown'"));
    }
}
