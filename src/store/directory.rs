//! @ai:module:intent Content store backed by a directory of markdown prompt files
//! @ai:module:layer infrastructure
//! @ai:module:public_api DirectoryStore, natural_cmp
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::store::{ContentStore, ResolvedContent};
use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Version label for a prompt stored as a single `<name>.md` file
pub const SINGLE_FILE_VERSION: &str = "current";

const TAGS_FILE: &str = "tags.toml";

#[derive(Debug, Default, Deserialize)]
struct TagsFile {
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

/// @ai:intent Resolve prompts from `<root>/<name>.md` or `<root>/<name>/<version>.md`
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// @ai:intent Version labels for a versioned prompt, in natural order
    /// @ai:effects fs:read
    pub fn versions(&self, name: &str) -> Result<Vec<String>> {
        let dir = self.root.join(name);
        let mut versions = Vec::new();

        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                versions.push(stem.to_string());
            }
        }

        versions.sort_by(|a, b| natural_cmp(a, b));
        Ok(versions)
    }

    /// @ai:intent Tag -> version map from `tags.toml`, empty when absent
    /// @ai:effects fs:read
    fn tags(&self, name: &str) -> Result<BTreeMap<String, String>> {
        let path = self.root.join(name).join(TAGS_FILE);
        if !path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = std::fs::read_to_string(&path)?;
        let file: TagsFile = toml::from_str(&content)?;
        Ok(file.tags)
    }

    fn read(&self, name: &str, version: &str, path: &Path) -> Result<ResolvedContent> {
        Ok(ResolvedContent {
            name: name.to_string(),
            version: version.to_string(),
            content: std::fs::read_to_string(path)?,
        })
    }
}

impl ContentStore for DirectoryStore {
    /// @ai:effects fs:read
    fn resolve(&self, name: &str, version: Option<&str>) -> Result<ResolvedContent> {
        if !is_safe_segment(name) || version.map_or(false, |v| !is_safe_segment(v)) {
            return Err(Error::not_found(name, version));
        }

        let dir = self.root.join(name);

        if dir.is_dir() {
            let versions = self.versions(name)?;

            let label = match version {
                None => versions.last().cloned(),
                Some(reference) if versions.iter().any(|v| v == reference) => {
                    Some(reference.to_string())
                }
                Some(reference) => self
                    .tags(name)?
                    .get(reference)
                    .filter(|target| versions.contains(target))
                    .cloned(),
            };

            let label = label.ok_or_else(|| Error::not_found(name, version))?;
            return self.read(name, &label, &dir.join(format!("{}.md", label)));
        }

        let file = self.root.join(format!("{}.md", name));
        match version {
            _ if !file.is_file() => Err(Error::not_found(name, version)),
            Some(reference) if reference != SINGLE_FILE_VERSION => {
                Err(Error::not_found(name, version))
            }
            _ => self.read(name, SINGLE_FILE_VERSION, &file),
        }
    }
}

fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\'])
}

/// @ai:intent Compare labels so that numeric runs order numerically (`v2` < `v10`)
/// @ai:effects pure
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let ln = take_digits(&mut left);
                let rn = take_digits(&mut right);
                let ordering = ln
                    .trim_start_matches('0')
                    .len()
                    .cmp(&rn.trim_start_matches('0').len())
                    .then_with(|| ln.trim_start_matches('0').cmp(rn.trim_start_matches('0')));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(l), Some(r)) => {
                if l != r {
                    return l.cmp(&r);
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
        digits.push(c);
        chars.next();
    }
    digits
}
