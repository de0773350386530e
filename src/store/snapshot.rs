//! @ai:module:intent Storage for snapshot assertion baselines
//! @ai:module:layer infrastructure
//! @ai:module:public_api SnapshotStore, MemorySnapshotStore, FileSnapshotStore
//! @ai:module:stateless false

use crate::error::Result;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Mutex;

/// @ai:intent Baseline lookup and write, keyed by suite and test name
pub trait SnapshotStore: Send + Sync {
    /// @ai:intent Stored baseline for a test, if any
    fn get(&self, suite: &str, test: &str) -> Result<Option<String>>;

    /// @ai:intent Replace the baseline for a test
    fn put(&self, suite: &str, test: &str, text: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    baselines: Mutex<HashMap<(String, String), String>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(String, String), String>> {
        self.baselines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn get(&self, suite: &str, test: &str) -> Result<Option<String>> {
        Ok(self.lock().get(&(suite.to_string(), test.to_string())).cloned())
    }

    fn put(&self, suite: &str, test: &str, text: &str) -> Result<()> {
        self.lock()
            .insert((suite.to_string(), test.to_string()), text.to_string());
        Ok(())
    }
}

/// @ai:intent One pretty JSON object per suite, mapping test name to baseline
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, suite: &str) -> PathBuf {
        let file: String = suite
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file))
    }

    /// @ai:effects fs:read
    fn read(&self, suite: &str) -> Result<BTreeMap<String, String>> {
        let path = self.path(suite);
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl SnapshotStore for FileSnapshotStore {
    /// @ai:effects fs:read
    fn get(&self, suite: &str, test: &str) -> Result<Option<String>> {
        Ok(self.read(suite)?.remove(test))
    }

    /// @ai:effects fs:read, fs:write
    fn put(&self, suite: &str, test: &str, text: &str) -> Result<()> {
        let mut baselines = self.read(suite)?;
        baselines.insert(test.to_string(), text.to_string());

        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(&baselines)?;
        std::fs::write(self.path(suite), json)?;

        tracing::debug!("Updated snapshot {}/{}", suite, test);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemorySnapshotStore::new();
        assert_eq!(store.get("suite", "case").unwrap(), None);

        store.put("suite", "case", "baseline").unwrap();
        assert_eq!(store.get("suite", "case").unwrap().as_deref(), Some("baseline"));
        assert_eq!(store.get("other", "case").unwrap(), None);
    }

    #[test]
    fn test_file_store_keeps_other_tests() {
        let dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("snapshots"));

        store.put("greeting suite", "a", "first").unwrap();
        store.put("greeting suite", "b", "second").unwrap();
        store.put("greeting suite", "a", "updated").unwrap();

        assert_eq!(store.get("greeting suite", "a").unwrap().as_deref(), Some("updated"));
        assert_eq!(store.get("greeting suite", "b").unwrap().as_deref(), Some("second"));
        assert!(dir.path().join("snapshots/greeting_suite.json").exists());
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::new(dir.path());
        assert_eq!(store.get("none", "x").unwrap(), None);
    }
}
