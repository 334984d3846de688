use crate::error::{Result, SnapshotError};
use crate::model::Snapshot;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

pub const SNAPSHOT_DIR: &str = ".codeintel";
pub const SNAPSHOT_FILE: &str = "snapshot.json";

/// Fixed project-relative location of the persisted snapshot document.
pub fn snapshot_path(root: &Path) -> PathBuf {
    root.join(SNAPSHOT_DIR).join(SNAPSHOT_FILE)
}

struct CachedRead {
    mtime: SystemTime,
    snapshot: Arc<Snapshot>,
}

/// Reads and writes the persisted snapshot.
///
/// Repeated reads are served from a small cache keyed by path and mtime and
/// re-read only when the underlying file changes. Writes replace the document
/// wholesale; concurrent writers race with last-write-wins by design.
pub struct IntelStore {
    cache: Mutex<HashMap<PathBuf, CachedRead>>,
}

impl IntelStore {
    pub fn new() -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Read the snapshot for a project root, or `None` when none is persisted.
    pub fn read(&self, root: &Path) -> Result<Option<Arc<Snapshot>>> {
        let path = snapshot_path(root);
        let meta = match std::fs::metadata(&path) {
            Ok(meta) => meta,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let mtime = meta.modified()?;

        if let Ok(cache) = self.cache.lock() {
            if let Some(cached) = cache.get(&path) {
                if cached.mtime == mtime {
                    return Ok(Some(Arc::clone(&cached.snapshot)));
                }
            }
        }

        let bytes = std::fs::read(&path)?;
        let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
        let snapshot = Arc::new(snapshot);

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(
                path,
                CachedRead {
                    mtime,
                    snapshot: Arc::clone(&snapshot),
                },
            );
        }

        Ok(Some(snapshot))
    }

    /// Overwrite the persisted snapshot for a project root.
    pub fn write(&self, root: &Path, snapshot: &Snapshot) -> Result<()> {
        let path = snapshot_path(root);
        let dir = path
            .parent()
            .ok_or_else(|| SnapshotError::InvalidPath("snapshot path has no parent".into()))?;
        std::fs::create_dir_all(dir)?;

        let bytes = serde_json::to_vec_pretty(snapshot)?;
        std::fs::write(&path, bytes)?;
        log::debug!("Wrote snapshot to {}", path.display());

        // Refresh the read cache so a write immediately followed by a read
        // does not hit the filesystem again.
        if let Ok(mtime) = std::fs::metadata(&path).and_then(|m| m.modified()) {
            if let Ok(mut cache) = self.cache.lock() {
                cache.insert(
                    path,
                    CachedRead {
                        mtime,
                        snapshot: Arc::new(snapshot.clone()),
                    },
                );
            }
        }

        Ok(())
    }
}

impl Default for IntelStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FileRecord;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn read_returns_none_without_snapshot() {
        let temp = tempdir().unwrap();
        let store = IntelStore::new();
        assert!(store.read(temp.path()).unwrap().is_none());
    }

    #[test]
    fn write_then_read_round_trips() {
        let temp = tempdir().unwrap();
        let store = IntelStore::new();

        let mut snapshot = Snapshot::empty();
        snapshot.generated_at = Some("2026-01-01T00:00:00+00:00".to_string());
        snapshot
            .files
            .insert("a.js".to_string(), FileRecord::zeroed(Some("javascript".into())));

        store.write(temp.path(), &snapshot).unwrap();
        let back = store.read(temp.path()).unwrap().unwrap();
        assert_eq!(*back, snapshot);
    }

    #[test]
    fn read_is_cached_until_file_changes() {
        let temp = tempdir().unwrap();
        let store = IntelStore::new();

        let snapshot = Snapshot::empty();
        store.write(temp.path(), &snapshot).unwrap();

        let first = store.read(temp.path()).unwrap().unwrap();
        let second = store.read(temp.path()).unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn write_replaces_wholesale() {
        let temp = tempdir().unwrap();
        let store = IntelStore::new();

        let mut first = Snapshot::empty();
        first
            .files
            .insert("old.js".to_string(), FileRecord::zeroed(None));
        store.write(temp.path(), &first).unwrap();

        let second = Snapshot::empty();
        store.write(temp.path(), &second).unwrap();

        let back = store.read(temp.path()).unwrap().unwrap();
        assert!(back.files.is_empty());
    }
}
