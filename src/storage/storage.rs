use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// A place to keep small string payloads between sessions.
///
/// Implementations fail gracefully: `get_item` answers `None` and
/// `set_item` does nothing when the backing store is unusable.
pub trait StorageBackend: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str);
}

/// Session-only storage backed by a map.
#[derive(Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.lock().unwrap().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.items
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }
}

/// One file per key beneath a directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set_item(&self, key: &str, value: &str) {
        if let Err(error) = fs::create_dir_all(&self.dir)
            .and_then(|_| fs::write(self.path_for(key), value))
        {
            tracing::warn!(key, %error, "dropping storage write");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("estimations"), None);
        storage.set_item("estimations", "{}");
        assert_eq!(storage.get_item("estimations").as_deref(), Some("{}"));
    }

    #[test]
    fn file_storage_round_trip() {
        let dir = std::env::temp_dir().join("urlstate-storage-test");
        let _ = fs::remove_dir_all(&dir);
        let storage = FileStorage::new(&dir);
        assert_eq!(storage.get_item("estimations"), None);
        storage.set_item("estimations", r#"{"0":{"1":2.0}}"#);
        assert_eq!(
            storage.get_item("estimations").as_deref(),
            Some(r#"{"0":{"1":2.0}}"#)
        );
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn unusable_directory_is_silent() {
        let storage = FileStorage::new("/dev/null/not-a-directory");
        storage.set_item("estimations", "{}");
        assert_eq!(storage.get_item("estimations"), None);
    }
}
