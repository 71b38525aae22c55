use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Durable key → JSON document store backing all studio state.
/// One file per key under the data directory; every save is a full
/// synchronous snapshot, last writer wins.
#[derive(Debug, Clone)]
pub struct PersistedStore {
    dir: PathBuf,
}

impl PersistedStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).context("Failed to create data directory")?;
        Ok(PersistedStore { dir })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Load the value stored under `key`, falling back to `default` when
    /// the entry is missing. A corrupted entry is discarded so the next
    /// save starts clean; the caller never sees the parse error.
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let path = self.entry_path(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return default,
            Err(e) => {
                warn!("Failed to read '{}': {}", path.display(), e);
                return default;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Corrupted entry '{}', clearing: {}", key, e);
                if let Err(e) = fs::remove_file(&path) {
                    warn!("Failed to clear corrupted entry '{}': {}", key, e);
                }
                default
            }
        }
    }

    /// Persist a full snapshot under `key`. Write failures are logged and
    /// swallowed: durability is traded for availability.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string_pretty(value) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize entry '{}': {}", key, e);
                return;
            }
        };
        if let Err(e) = fs::write(self.entry_path(key), json) {
            warn!("Failed to save entry '{}': {}", key, e);
        }
    }

    /// Remove the entry for `key`, if any.
    pub fn clear(&self, key: &str) {
        let path = self.entry_path(key);
        if let Err(e) = fs::remove_file(&path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to clear entry '{}': {}", key, e);
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static COUNTER: AtomicUsize = AtomicUsize::new(0);

    /// A store rooted in a fresh temp directory, isolated per test.
    pub fn temp_store() -> PersistedStore {
        let dir = std::env::temp_dir().join(format!(
            "contentjet-test-{}-{}",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::SeqCst)
        ));
        PersistedStore::new(dir).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::testing::temp_store;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Doc {
        name: String,
        count: u32,
    }

    #[test]
    fn missing_entry_returns_default() {
        let store = temp_store();
        let doc = store.load("absent", Doc { name: "default".into(), count: 0 });
        assert_eq!(doc.name, "default");
    }

    #[test]
    fn save_then_load_roundtrips() {
        let store = temp_store();
        store.save("doc", &Doc { name: "kept".into(), count: 3 });
        let doc = store.load("doc", Doc { name: "default".into(), count: 0 });
        assert_eq!(doc, Doc { name: "kept".into(), count: 3 });
    }

    #[test]
    fn corrupted_entry_is_discarded_and_default_returned() {
        let store = temp_store();
        std::fs::write(store.entry_path("doc"), "{not json at all").unwrap();

        let doc = store.load("doc", Doc { name: "default".into(), count: 0 });
        assert_eq!(doc.name, "default");

        // The bad payload is gone; a later load starts from a clean slate.
        assert!(!store.entry_path("doc").exists());
    }

    #[test]
    fn clear_removes_entry_and_is_idempotent() {
        let store = temp_store();
        store.save("doc", &Doc { name: "kept".into(), count: 1 });
        store.clear("doc");
        store.clear("doc");
        let doc = store.load("doc", Doc { name: "default".into(), count: 0 });
        assert_eq!(doc.count, 0);
    }
}
