//! @ai:module:intent Resolve target prompt content and persist snapshot baselines
//! @ai:module:layer infrastructure
//! @ai:module:public_api ContentStore, ResolvedContent, MemoryStore, DirectoryStore, SnapshotStore, MemorySnapshotStore, FileSnapshotStore

pub mod directory;
pub mod memory;
pub mod snapshot;

pub use directory::DirectoryStore;
pub use memory::MemoryStore;
pub use snapshot::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore};

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// @ai:intent Content of one resolved prompt version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedContent {
    pub name: String,
    pub version: String,
    pub content: String,
}

/// @ai:intent Read-only lookup of a named prompt's content by version or tag
pub trait ContentStore: Send + Sync {
    /// @ai:intent Resolve a prompt; `None` selects the latest version
    /// @ai:post Err(NotFound) when the name or the version reference is absent
    fn resolve(&self, name: &str, version: Option<&str>) -> Result<ResolvedContent>;
}
