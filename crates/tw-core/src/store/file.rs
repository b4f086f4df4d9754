use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use tracing::debug;

use super::{StoreError, TrackingStore};

type Entries = BTreeMap<String, String>;

/// JSON file holding a flat `key -> string` object.
///
/// The file is re-read on every access so separate processes sharing it
/// observe each other's writes. Writes land in a sibling temp file first
/// and are renamed into place.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Entries, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Entries::new());
        }
        serde_json::from_str(&content)
            .map_err(|e| StoreError::Corrupt(format!("{}: {}", self.path.display(), e)))
    }

    fn save(&self, entries: &Entries) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_string_pretty(entries)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), keys = entries.len(), "store flushed");
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut Entries) -> bool) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.load()?;
        if f(&mut entries) {
            self.save(&entries)?;
        }
        Ok(())
    }
}

impl TrackingStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(|entries| entries.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("state.json"));

        assert_eq!(store.get("k").unwrap(), None);
        store.remove("k").unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        FileStore::new(&path).set("current", "t1").unwrap();
        FileStore::new(&path).set("other", "p9").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("current").unwrap().as_deref(), Some("t1"));
        assert_eq!(reopened.get("other").unwrap().as_deref(), Some("p9"));

        reopened.remove("current").unwrap();
        assert_eq!(FileStore::new(&path).get("current").unwrap(), None);
        assert_eq!(FileStore::new(&path).get("other").unwrap().as_deref(), Some("p9"));
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json").unwrap();

        let err = FileStore::new(&path).get("k").unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }
}
