//! Content-addressed cache layout.
//!
//! Entries live at `<root>/robot.<hash>/reachability.<manipulator>.pp`, so a
//! robot whose kinematics change gets a fresh directory automatically.

use std::fs;
use std::path::{Path, PathBuf};

use reach_types::ReachabilityData;
use tracing::{debug, info};

use crate::errors::{LoadError, SaveError};
use crate::load::load_model_file;
use crate::metadata::CacheMetadata;
use crate::save::save_model_file;

/// Identifies one cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub robot_hash: String,
    pub manipulator: String,
}

impl CacheKey {
    pub fn new(robot_hash: impl Into<String>, manipulator: impl Into<String>) -> Self {
        Self {
            robot_hash: robot_hash.into(),
            manipulator: manipulator.into(),
        }
    }

    /// Path of this entry relative to a cache root.
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(format!("robot.{}", sanitize(&self.robot_hash)))
            .join(format!("reachability.{}.pp", sanitize(&self.manipulator)))
    }
}

/// Replace characters that cannot appear in a single path component.
fn sanitize(component: &str) -> String {
    let cleaned: String = component
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() || c.is_whitespace() => '_',
            c => c,
        })
        .collect();
    match cleaned.as_str() {
        "" | "." | ".." => "_".repeat(cleaned.len().max(1)),
        _ => cleaned,
    }
}

/// A directory of cached reachability blobs.
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.relative_path())
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.path_for(key).is_file()
    }

    pub fn load(&self, key: &CacheKey) -> Result<(ReachabilityData, CacheMetadata), LoadError> {
        let path = self.path_for(key);
        let loaded = load_model_file(&path)?;
        debug!(path = %path.display(), "cache hit");
        Ok(loaded)
    }

    /// Write an entry and return the path it landed at.
    pub fn save(
        &self,
        key: &CacheKey,
        data: &ReachabilityData,
        metadata: &CacheMetadata,
    ) -> Result<PathBuf, SaveError> {
        let path = self.path_for(key);
        save_model_file(data, metadata, &path)?;
        info!(path = %path.display(), "wrote reachability cache");
        Ok(path)
    }

    /// Delete an entry. Returns `false` if there was nothing to delete.
    pub fn remove(&self, key: &CacheKey) -> std::io::Result<bool> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_path_layout() {
        let store = CacheStore::new("/tmp/cache");
        let key = CacheKey::new("abc123", "arm");
        assert_eq!(
            store.path_for(&key),
            PathBuf::from("/tmp/cache/robot.abc123/reachability.arm.pp")
        );
    }

    #[test]
    fn hostile_names_stay_in_one_component() {
        let key = CacheKey::new("../etc", "left/arm");
        let rel = key.relative_path();
        assert_eq!(rel, PathBuf::from("robot..._etc/reachability.left_arm.pp"));
        assert_eq!(rel.components().count(), 2);
    }

    #[test]
    fn dot_only_names_are_replaced() {
        assert_eq!(sanitize(".."), "__");
        assert_eq!(sanitize(""), "_");
        assert_eq!(sanitize("a b"), "a_b");
    }
}
