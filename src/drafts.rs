//! Durable draft cache for in-flight settings edits
//!
//! Drafts outlive a single run of the console so that an in-memory draft
//! lost to a restart can be recovered on the next save. The store is a
//! plain key-value surface injected into the settings controller; the
//! controller owns the policy (write-on-submit, read-on-recovery, no
//! automatic expiry), the store only persists strings.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// Key under which the last submitted general settings payload is cached
pub const GENERAL_DRAFT_KEY: &str = "cachedGeneralSettings";

/// Key recording the last successful combined save, for operator debugging.
/// Written on every successful save, never read back by the application.
pub const LAST_SAVED_KEY: &str = "lastSavedConfig";

/// Key-value persistence for draft payloads
pub trait DraftStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: DraftStore + ?Sized> DraftStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        (**self).put(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Draft store backed by one JSON file per key under the drafts directory
pub struct FileDraftStore {
    dir: PathBuf,
}

impl FileDraftStore {
    pub fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).context("Failed to create drafts directory")?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl DraftStore for FileDraftStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read draft file {}", path.display()))?;
        Ok(Some(contents))
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        fs::write(&path, value)
            .with_context(|| format!("Failed to write draft file {}", path.display()))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove draft file {}", path.display()))?;
        }
        Ok(())
    }
}

/// In-memory draft store for tests
#[derive(Default)]
pub struct MemoryDraftStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DraftStore for MemoryDraftStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileDraftStore::new(dir.path().join("drafts")).unwrap();

        assert_eq!(store.get(GENERAL_DRAFT_KEY).unwrap(), None);

        store.put(GENERAL_DRAFT_KEY, r#"{"company_name":"Acme"}"#).unwrap();
        assert_eq!(
            store.get(GENERAL_DRAFT_KEY).unwrap().as_deref(),
            Some(r#"{"company_name":"Acme"}"#)
        );
    }

    #[test]
    fn test_file_store_overwrites_in_place() {
        let dir = TempDir::new().unwrap();
        let store = FileDraftStore::new(dir.path().to_path_buf()).unwrap();

        store.put(GENERAL_DRAFT_KEY, "first").unwrap();
        store.put(GENERAL_DRAFT_KEY, "second").unwrap();
        assert_eq!(store.get(GENERAL_DRAFT_KEY).unwrap().as_deref(), Some("second"));

        // One file per key, no accumulation of old drafts
        let count = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_file_store_remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = FileDraftStore::new(dir.path().to_path_buf()).unwrap();

        store.put("k", "v").unwrap();
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryDraftStore::new();
        store.put("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }
}
