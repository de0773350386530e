//! @ai:module:intent In-memory content store
//! @ai:module:layer infrastructure
//! @ai:module:public_api MemoryStore
//! @ai:module:stateless false

use crate::error::{Error, Result};
use crate::store::{ContentStore, ResolvedContent};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
struct Entry {
    versions: Vec<(String, String)>,
    tags: HashMap<String, String>,
}

/// @ai:intent Prompt versions kept in insertion order; the last one is latest
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Entry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Append a version, replacing the content if the label already exists
    /// @ai:effects state:write
    pub fn add_version(
        &mut self,
        name: impl Into<String>,
        version: impl Into<String>,
        content: impl Into<String>,
    ) -> &mut Self {
        let entry = self.entries.entry(name.into()).or_default();
        let version = version.into();
        let content = content.into();

        match entry.versions.iter_mut().find(|(label, _)| *label == version) {
            Some(existing) => existing.1 = content,
            None => entry.versions.push((version, content)),
        }

        self
    }

    /// @ai:intent Point a tag at a version label
    /// @ai:effects state:write
    pub fn tag(
        &mut self,
        name: &str,
        tag: impl Into<String>,
        version: impl Into<String>,
    ) -> &mut Self {
        if let Some(entry) = self.entries.get_mut(name) {
            entry.tags.insert(tag.into(), version.into());
        }
        self
    }
}

impl ContentStore for MemoryStore {
    fn resolve(&self, name: &str, version: Option<&str>) -> Result<ResolvedContent> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| Error::not_found(name, version))?;

        let found = match version {
            None => entry.versions.last(),
            Some(reference) => {
                let label = if entry.versions.iter().any(|(v, _)| v == reference) {
                    reference
                } else {
                    entry.tags.get(reference).map(String::as_str).unwrap_or(reference)
                };
                entry.versions.iter().find(|(v, _)| v == label)
            }
        };

        found
            .map(|(v, content)| ResolvedContent {
                name: name.to_string(),
                version: v.clone(),
                content: content.clone(),
            })
            .ok_or_else(|| Error::not_found(name, version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store
            .add_version("greeting", "v1", "Hi {{name}}")
            .add_version("greeting", "v2", "Hello {{name}}")
            .tag("greeting", "prod", "v1");
        store
    }

    #[test]
    fn test_latest_is_last_inserted() {
        let resolved = store().resolve("greeting", None).unwrap();
        assert_eq!(resolved.version, "v2");
        assert_eq!(resolved.content, "Hello {{name}}");
    }

    #[test]
    fn test_resolve_by_label_and_tag() {
        let store = store();
        assert_eq!(store.resolve("greeting", Some("v1")).unwrap().version, "v1");
        assert_eq!(store.resolve("greeting", Some("prod")).unwrap().version, "v1");
    }

    #[test]
    fn test_missing_name_or_version() {
        let store = store();
        assert!(matches!(
            store.resolve("farewell", None),
            Err(Error::NotFound { .. })
        ));
        match store.resolve("greeting", Some("v9")) {
            Err(Error::NotFound { name, version }) => {
                assert_eq!(name, "greeting");
                assert_eq!(version.as_deref(), Some("v9"));
            }
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[test]
    fn test_re_adding_version_replaces_content() {
        let mut store = store();
        store.add_version("greeting", "v1", "Yo");
        let resolved = store.resolve("greeting", Some("v1")).unwrap();
        assert_eq!(resolved.content, "Yo");
        assert_eq!(store.resolve("greeting", None).unwrap().version, "v2");
    }
}
