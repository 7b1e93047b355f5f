//! Write serialization for persisted state files
//!
//! Provides per-path locking so that concurrent read-modify-write cycles on the
//! same state file (sync snapshot, selection store) are applied one at a time.
//! Different files never block each other. Paths are keyed by their canonical
//! form, so `root/.aiwork/x.json` and `root/sub/../.aiwork/x.json` share one lock.

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Drop `.` components and fold `..` into its parent without touching the filesystem.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out
}

/// Canonical key for `path`.
///
/// The deepest existing ancestor is resolved through the filesystem (symlinks
/// included); the not-yet-created tail is appended as normalized. The key stays
/// stable when the missing directories are created later.
fn lock_key(path: &Path) -> PathBuf {
    let normalized = normalize_lexically(path);
    let mut existing = normalized.as_path();
    let mut tail: Vec<OsString> = Vec::new();
    loop {
        if let Ok(mut key) = dunce::canonicalize(existing) {
            key.extend(tail.iter().rev());
            return key;
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
                tail.push(name.to_os_string());
                existing = parent;
            }
            _ => return normalized,
        }
    }
}

/// Per-path lock manager
///
/// Shared by every store opened in one process; clone the `Arc` into each store.
pub struct PathLockManager {
    /// Map from file path to its lock
    locks: RwLock<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl PathLockManager {
    pub fn new() -> Self {
        Self {
            locks: RwLock::new(HashMap::new()),
        }
    }

    /// Get or create the lock guarding `path`
    pub fn get_lock(&self, path: &Path) -> Arc<Mutex<()>> {
        let key = lock_key(path);
        {
            let map = self.locks.read();
            if let Some(lock) = map.get(&key) {
                return lock.clone();
            }
        }

        let mut map = self.locks.write();
        // Another thread may have inserted between the read and write lock.
        map.entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Number of distinct paths that have been locked
    pub fn tracked_paths(&self) -> usize {
        self.locks.read().len()
    }
}

impl Default for PathLockManager {
    fn default() -> Self {
        Self::new()
    }
}
