//! Persisted key-value settings store
//!
//! Backs the library registry (and any other process-wide settings) with a
//! single `settings.json` object map. The store is an explicit value with an
//! explicit `load`; nothing happens at module-load time and every mutation is
//! persisted immediately.
//!
//! No locking: two rapid writers race and the last write wins. Acceptable for
//! a single-user desktop tool; see the crate docs for the consistency gap.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::store::{self, Result, StoreError};

const SETTINGS_FILE: &str = "settings.json";

/// Default application data directory (e.g. `~/.local/share/studium`).
pub fn default_data_dir() -> Result<PathBuf> {
    dirs::data_local_dir()
        .map(|p| p.join("studium"))
        .ok_or_else(|| {
            StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no local data directory for this platform",
            ))
        })
}

/// JSON-file-backed key-value store.
pub struct SettingsStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl SettingsStore {
    /// Load the store from `base_dir/settings.json`.
    ///
    /// An absent file yields an empty store; a file that exists but does not
    /// parse is a `Corrupt` error (it is user-editable, so do not silently
    /// wipe it).
    pub fn load(base_dir: &std::path::Path) -> Result<Self> {
        let path = base_dir.join(SETTINGS_FILE);
        let values = match store::read_json::<Map<String, Value>>(&path) {
            Ok(values) => values,
            Err(StoreError::NotFound(_)) => Map::new(),
            Err(e) => return Err(e),
        };
        Ok(Self { path, values })
    }

    /// Get a typed value. A stored value that no longer deserializes as `T`
    /// is logged and treated as absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.values.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(typed) => Some(typed),
            Err(e) => {
                log::warn!("Ignoring malformed settings value for '{}': {}", key, e);
                None
            }
        }
    }

    /// Set a value and persist the store.
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        self.values.insert(key.to_string(), value);
        self.persist()
    }

    /// Remove a key and persist the store.
    pub fn delete(&mut self, key: &str) -> Result<()> {
        if self.values.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    /// Remove every key and persist the store.
    pub fn clear(&mut self) -> Result<()> {
        self.values.clear();
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        store::write_json(&self.path, &self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_empty_then_set_and_get() {
        let dir = TempDir::new().unwrap();
        let mut settings = SettingsStore::load(dir.path()).unwrap();

        assert_eq!(settings.get::<Vec<String>>("libraryPaths"), None);

        settings
            .set("libraryPaths", &vec!["/home/me/study".to_string()])
            .unwrap();
        assert_eq!(
            settings.get::<Vec<String>>("libraryPaths"),
            Some(vec!["/home/me/study".to_string()])
        );
    }

    #[test]
    fn test_values_survive_reload() {
        let dir = TempDir::new().unwrap();
        {
            let mut settings = SettingsStore::load(dir.path()).unwrap();
            settings.set("theme", &"dark".to_string()).unwrap();
        }

        let settings = SettingsStore::load(dir.path()).unwrap();
        assert_eq!(settings.get::<String>("theme"), Some("dark".to_string()));
    }

    #[test]
    fn test_delete_and_clear() {
        let dir = TempDir::new().unwrap();
        let mut settings = SettingsStore::load(dir.path()).unwrap();
        settings.set("a", &1u32).unwrap();
        settings.set("b", &2u32).unwrap();

        settings.delete("a").unwrap();
        assert_eq!(settings.get::<u32>("a"), None);
        assert_eq!(settings.get::<u32>("b"), Some(2));

        settings.clear().unwrap();
        assert_eq!(settings.get::<u32>("b"), None);
    }

    #[test]
    fn test_wrong_typed_value_is_treated_as_absent() {
        let dir = TempDir::new().unwrap();
        let mut settings = SettingsStore::load(dir.path()).unwrap();
        settings.set("key", &"not a number".to_string()).unwrap();
        assert_eq!(settings.get::<u32>("key"), None);
    }
}
