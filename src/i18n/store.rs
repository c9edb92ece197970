//! Persisted locale selection
//!
//! The chosen locale survives restarts under a single storage key.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::error::{I18nError, I18nResult};

/// Storage key holding the user's locale code
pub const LOCALE_STORAGE_KEY: &str = "kin241-locale";

/// Client-side storage for the selected locale code
pub trait LocaleStore: Send + Sync {
    /// Read the stored locale code, if any
    fn load(&self) -> Option<String>;

    /// Persist a locale code
    fn save(&self, code: &str) -> I18nResult<()>;
}

/// Locale store backed by a small JSON key/value file
#[derive(Debug, Clone)]
pub struct FileLocaleStore {
    path: PathBuf,
}

impl FileLocaleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default state file under the user config directory
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join("kinyu").join("client-state.json"))
            .unwrap_or_else(|| PathBuf::from("./kinyu-state.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> BTreeMap<String, String> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return BTreeMap::new(),
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable locale state {:?}: {}", self.path, e);
            BTreeMap::new()
        })
    }
}

impl LocaleStore for FileLocaleStore {
    fn load(&self) -> Option<String> {
        self.read_entries().remove(LOCALE_STORAGE_KEY)
    }

    fn save(&self, code: &str) -> I18nResult<()> {
        let persist_err = |error: String| I18nError::Persist {
            path: self.path.clone(),
            error,
        };

        let mut entries = self.read_entries();
        entries.insert(LOCALE_STORAGE_KEY.to_string(), code.to_string());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| persist_err(e.to_string()))?;
            }
        }

        let content =
            serde_json::to_string_pretty(&entries).map_err(|e| persist_err(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| persist_err(e.to_string()))?;

        tracing::debug!("Persisted locale {} to {:?}", code, self.path);
        Ok(())
    }
}

/// In-memory locale store
#[derive(Debug, Default)]
pub struct MemoryLocaleStore {
    value: Mutex<Option<String>>,
}

impl MemoryLocaleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a code
    pub fn with_value(code: &str) -> Self {
        Self {
            value: Mutex::new(Some(code.to_string())),
        }
    }
}

impl LocaleStore for MemoryLocaleStore {
    fn load(&self) -> Option<String> {
        self.value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, code: &str) -> I18nResult<()> {
        // a panicked holder cannot leave a half-written Option behind
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = Some(code.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_missing_file() {
        let dir = tempdir().unwrap();
        let store = FileLocaleStore::new(dir.path().join("state.json"));
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_file_store_roundtrip_creates_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");
        let store = FileLocaleStore::new(&path);

        store.save("ja").unwrap();
        assert!(path.exists());
        assert_eq!(store.load().as_deref(), Some("ja"));

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains(LOCALE_STORAGE_KEY));
    }

    #[test]
    fn test_file_store_keeps_other_entries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

        let store = FileLocaleStore::new(&path);
        store.save("en").unwrap();

        let entries: BTreeMap<String, String> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(entries.get("theme").map(String::as_str), Some("dark"));
        assert_eq!(entries.get(LOCALE_STORAGE_KEY).map(String::as_str), Some("en"));
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileLocaleStore::new(&path);
        assert_eq!(store.load(), None);

        store.save("vi").unwrap();
        assert_eq!(store.load().as_deref(), Some("vi"));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryLocaleStore::new();
        assert_eq!(store.load(), None);
        store.save("en").unwrap();
        assert_eq!(store.load().as_deref(), Some("en"));
        assert_eq!(MemoryLocaleStore::with_value("ja").load().as_deref(), Some("ja"));
    }

    #[test]
    fn test_memory_store_survives_poisoned_lock() {
        let store = std::sync::Arc::new(MemoryLocaleStore::with_value("vi"));
        let holder = store.clone();
        let panicked = std::thread::spawn(move || {
            let _guard = holder.value.lock().unwrap();
            panic!("holder panicked");
        })
        .join()
        .is_err();
        assert!(panicked);
        assert!(store.value.is_poisoned());

        store.save("ja").unwrap();
        assert_eq!(store.load().as_deref(), Some("ja"));
    }
}
