//! FileStore: string map persisted to a JSON file
//!
//! The file holds a single JSON object of string values:
//!
//! ```json
//! {"settings":"{\"theme\":\"dark\"}","visits":"3"}
//! ```
//!
//! The whole map is mirrored in memory. Every mutation rewrites the file
//! while still holding the write lock, so the file always reflects a
//! complete state that some sequence of calls produced.
//!
//! Writes are atomic: a uniquely named temp file in the same directory,
//! fsync, rename. Several handles on one path never share a temp file.
//! A mutation that fails to persist is rolled back in memory.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use keystash_core::{Error, KeyValueStore, Result};

use crate::entries::Entries;

/// File-backed backend; contents survive process restarts
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<Entries>,
}

impl FileStore {
    /// Open the store at `path`, creating an empty one if the file is missing
    ///
    /// # Errors
    ///
    /// Returns [`Error::Corruption`] if the file exists but is not a JSON
    /// object of strings, or [`Error::Io`] if it cannot be read.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_quota(path, None)
    }

    /// Open the store with an optional byte quota for new writes
    ///
    /// # Errors
    ///
    /// Same as [`FileStore::open`].
    pub fn open_with_quota(path: impl AsRef<Path>, quota: Option<usize>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let map = load_entries(&path)?;
        info!(path = %path.display(), entries = map.len(), "opened file store");
        Ok(Self {
            path,
            entries: RwLock::new(Entries::from_map(map, quota)),
        })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes currently held (keys plus values)
    pub fn used_bytes(&self) -> usize {
        self.entries.read().bytes()
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: String) -> Result<()> {
        let mut entries = self.entries.write();
        let previous = entries.get(key).cloned();
        entries.insert(key, value)?;
        if let Err(e) = write_entries(&self.path, entries.as_map()) {
            entries.restore(key, previous);
            return Err(e);
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write();
        let previous = match entries.get(key).cloned() {
            Some(v) => v,
            None => return Ok(()),
        };
        entries.remove(key);
        if let Err(e) = write_entries(&self.path, entries.as_map()) {
            entries.restore(key, Some(previous));
            return Err(e);
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut entries = self.entries.write();
        write_entries(&self.path, &BTreeMap::new())?;
        entries.clear();
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }

    fn keys(&self) -> Vec<String> {
        self.entries.read().keys()
    }
}

/// Read the entry map; a missing file is an empty map
fn load_entries(path: &Path) -> Result<BTreeMap<String, String>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => return Err(e.into()),
    };
    serde_json::from_str(&content).map_err(|e| {
        Error::Corruption(format!(
            "store file '{}' is not a JSON object of strings: {}",
            path.display(),
            e
        ))
    })
}

/// Write the entry map atomically (uniquely named temp + fsync + rename)
fn write_entries(path: &Path, map: &BTreeMap<String, String>) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let payload = serde_json::to_vec(map)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&payload)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    debug!(path = %path.display(), entries = map.len(), bytes = payload.len(), "persisted file store");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path().join("store.json")).unwrap();
        assert!(store.is_empty());
        // Nothing written until the first mutation
        assert!(!store.path().exists());
    }

    #[test]
    fn test_contents_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        {
            let store = FileStore::open(&path).unwrap();
            store.set_item("a", "1".to_string()).unwrap();
            store.set_item("b", "[1,2]".to_string()).unwrap();
            store.remove_item("a").unwrap();
        }

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.keys(), vec!["b".to_string()]);
        assert_eq!(reopened.get_item("b").unwrap().as_deref(), Some("[1,2]"));
    }

    #[test]
    fn test_clear_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        let store = FileStore::open(&path).unwrap();
        store.set_item("a", "1".to_string()).unwrap();
        store.clear().unwrap();
        drop(store);

        assert!(FileStore::open(&path).unwrap().is_empty());
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/store.json");
        let store = FileStore::open(&path).unwrap();
        store.set_item("k", "v".to_string()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_corrupt_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();
        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, Error::Corruption(_)));
    }

    #[test]
    fn test_quota_rejection_does_not_touch_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        let store = FileStore::open_with_quota(&path, Some(4)).unwrap();
        store.set_item("k", "v".to_string()).unwrap();
        assert!(store.set_item("k", "toolong".to_string()).is_err());
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get_item("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        let store = FileStore::open(&path).unwrap();
        store.set_item("k", "v".to_string()).unwrap();
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("store.json")]);
    }

    #[test]
    fn test_two_handles_on_one_path_write_concurrently() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        let value = "x".repeat(64 * 1024);

        let stores: Vec<_> = (0..2).map(|_| FileStore::open(&path).unwrap()).collect();
        let handles: Vec<_> = stores
            .into_iter()
            .enumerate()
            .map(|(t, store)| {
                let value = value.clone();
                std::thread::spawn(move || {
                    (0..50)
                        .filter(|i| store.set_item(&format!("t{t}-{i}"), value.clone()).is_err())
                        .count()
                })
            })
            .collect();
        let failures: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(failures, 0);

        // Last writer wins: the file holds one handle's complete map
        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.len(), 50);
        let prefix = &reopened.keys()[0][..3];
        assert!(reopened.keys().iter().all(|k| k.starts_with(prefix)));

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("store.json")]);
    }
}
