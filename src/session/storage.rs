use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, RwLock};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage format error: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Storage lock poisoned")]
    Poisoned,
}

/// String key/value storage, the persistence layer underneath the session.
///
/// Writes that touch several keys go through `set_items` so a backend can
/// apply them in one step.
pub trait KeyValueStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_items(&self, items: &[(&str, &str)]) -> Result<(), StorageError>;

    fn remove_items(&self, keys: &[&str]) -> Result<(), StorageError>;

    fn clear(&self) -> Result<(), StorageError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.set_items(&[(key, value)])
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.remove_items(&[key])
    }
}

/// Process-local storage. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.read().map_err(|_| StorageError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_items(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        let mut items = self.items.write().map_err(|_| StorageError::Poisoned)?;
        for (key, value) in entries {
            items.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    fn remove_items(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut items = self.items.write().map_err(|_| StorageError::Poisoned)?;
        for key in keys {
            items.remove(*key);
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut items = self.items.write().map_err(|_| StorageError::Poisoned)?;
        items.clear();
        Ok(())
    }
}

/// Storage persisted as a flat JSON object on disk.
///
/// Every mutation rewrites the whole file through a temporary sibling and a
/// rename, so readers never observe a half-written map.
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let json = fs::read_to_string(&self.path)?;
        if json.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&json)?)
    }

    fn write_map(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(items)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn update<F>(&self, mutate: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut items = match self.read_map() {
            Ok(items) => items,
            Err(StorageError::Format(e)) => {
                tracing::warn!(
                    "Overwriting unreadable session file {}: {}",
                    self.path.display(),
                    e
                );
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        mutate(&mut items);
        self.write_map(&items)
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_map()?.remove(key))
    }

    fn set_items(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        self.update(|items| {
            for (key, value) in entries {
                items.insert((*key).to_string(), (*value).to_string());
            }
        })
    }

    fn remove_items(&self, keys: &[&str]) -> Result<(), StorageError> {
        self.update(|items| {
            for key in keys {
                items.remove(*key);
            }
        })
    }

    fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_set_get_remove() {
        let storage = MemoryStorage::new();
        storage.set_item("token", "abc").unwrap();
        assert_eq!(storage.get_item("token").unwrap().as_deref(), Some("abc"));

        storage.remove_item("token").unwrap();
        assert!(storage.get_item("token").unwrap().is_none());
    }

    #[test]
    fn memory_storage_clear_removes_everything() {
        let storage = MemoryStorage::new();
        storage.set_items(&[("a", "1"), ("b", "2")]).unwrap();
        storage.clear().unwrap();
        assert!(storage.get_item("a").unwrap().is_none());
        assert!(storage.get_item("b").unwrap().is_none());
    }

    #[test]
    fn file_storage_missing_file_reads_as_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(tmp.path().join("session.json"));
        assert!(storage.get_item("token").unwrap().is_none());
    }

    #[test]
    fn file_storage_persists_across_instances() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("session.json");

        FileStorage::new(&path)
            .set_items(&[("token", "t1"), ("userName", "Ada")])
            .unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get_item("token").unwrap().as_deref(), Some("t1"));
        assert_eq!(reopened.get_item("userName").unwrap().as_deref(), Some("Ada"));
    }

    #[test]
    fn file_storage_writes_flat_json_object() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("session.json");
        let storage = FileStorage::new(&path);
        storage.set_item("userRole", "admin").unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["userRole"], "admin");
        assert!(!tmp.path().join("session.json.tmp").exists());
    }

    #[test]
    fn file_storage_clear_deletes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("session.json");
        let storage = FileStorage::new(&path);
        storage.set_item("token", "t1").unwrap();

        storage.clear().unwrap();
        assert!(!path.exists());
        // Clearing twice is fine
        storage.clear().unwrap();
    }

    #[test]
    fn file_storage_corrupt_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        let storage = FileStorage::new(&path);
        assert!(matches!(
            storage.get_item("token"),
            Err(StorageError::Format(_))
        ));
    }

    #[test]
    fn file_storage_writes_over_a_corrupt_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("session.json");
        fs::write(&path, "{not json").unwrap();
        let storage = FileStorage::new(&path);

        storage.set_items(&[("token", "t2"), ("userName", "Ada")]).unwrap();
        assert_eq!(storage.get_item("token").unwrap().as_deref(), Some("t2"));

        fs::write(&path, "[1, 2").unwrap();
        storage.remove_items(&["token"]).unwrap();
        assert!(storage.get_item("token").unwrap().is_none());
    }
}
