// src/ledger.rs

use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use tracing::{debug, error};

use crate::store::{RegistryValue, ValueStore};

/// First-write-wins record of pre-tweak values, keyed by
/// `key_path\value_name`.
///
/// An entry is captured at most once per process lifetime, so a restore
/// always returns the system to its original state no matter how many times a
/// tweak was toggled in between. Entries are never mutated or deleted; only a
/// process restart clears the ledger.
#[derive(Debug, Default)]
pub struct BackupLedger {
    entries: Mutex<IndexMap<String, RegistryValue>>,
}

fn composite_key(key_path: &str, value_name: &str) -> String {
    format!("{}\\{}", key_path, value_name)
}

impl BackupLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, IndexMap<String, RegistryValue>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Captures the current live value for `(key_path, value_name)` unless one
    /// was already captured. "Was not present" is itself a valid captured
    /// state. A failed read captures nothing and is reported to the caller so
    /// it can refuse to modify a value it could not back up.
    pub fn capture_if_absent(
        &self,
        store: &dyn ValueStore,
        key_path: &str,
        value_name: &str,
    ) -> Result<()> {
        let key = composite_key(key_path, value_name);
        let mut entries = self.lock();
        if entries.contains_key(&key) {
            return Ok(());
        }
        let value = store
            .read(key_path, value_name)
            .with_context(|| format!("Failed to capture prior value for '{}'", key))?;
        debug!("Captured prior value for '{}': {}", key, value);
        entries.insert(key, value);
        Ok(())
    }

    /// Returns the captured prior value, or `None` if the pair was never
    /// captured this session.
    pub fn get(&self, key_path: &str, value_name: &str) -> Option<RegistryValue> {
        self.lock().get(&composite_key(key_path, value_name)).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Serializes the ledger to a timestamped JSON document under `dir` and
    /// returns the written path. In-memory state is unaffected by failure.
    pub fn persist_snapshot(&self, dir: &Path) -> Result<PathBuf> {
        let entries = self.lock().clone();
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create backup directory '{}'", dir.display()))?;
        let file_name = format!(
            "registry_backup_{}.json",
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        );
        let path = dir.join(file_name);
        let json = serde_json::to_string_pretty(&entries).context("Failed to serialize ledger")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write snapshot '{}'", path.display()))?;
        debug!("Wrote backup snapshot with {} entries to '{}'", entries.len(), path.display());
        Ok(path)
    }

    /// Loads entries from a snapshot written by [`persist_snapshot`], applying
    /// the same insert-if-absent rule: an entry already captured in this
    /// process wins over the snapshot. Returns the number of entries inserted.
    ///
    /// [`persist_snapshot`]: BackupLedger::persist_snapshot
    pub fn load_snapshot(&self, path: &Path) -> Result<usize> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot '{}'", path.display()))?;
        let loaded: IndexMap<String, RegistryValue> = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse snapshot '{}'", path.display()))?;
        let mut entries = self.lock();
        let mut inserted = 0;
        for (key, value) in loaded {
            if !entries.contains_key(&key) {
                entries.insert(key, value);
                inserted += 1;
            }
        }
        debug!("Loaded {} entries from '{}'", inserted, path.display());
        Ok(inserted)
    }
}

/// Per-user directory for backup snapshots.
pub fn default_backup_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("TweakHub").join("Backups"))
}

/// Most recent snapshot in `dir`, by the lexicographic order of the
/// timestamped file names.
pub fn latest_snapshot(dir: &Path) -> Option<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            error!("Failed to list backup directory '{}': {}", dir.display(), e);
            return None;
        }
    };
    entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("registry_backup_") && n.ends_with(".json"))
        })
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    const PATH: &str = "HKCU\\Software\\TweakHubTest";

    fn temp_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tweakhub-ledger-{}-{}", tag, std::process::id()))
    }

    #[test]
    fn capture_records_absent_state() {
        let store = MemoryStore::new();
        let ledger = BackupLedger::new();

        ledger.capture_if_absent(&store, PATH, "NeverSet").unwrap();
        assert_eq!(ledger.get(PATH, "NeverSet"), Some(RegistryValue::Missing));
    }

    #[test]
    fn capture_is_first_write_wins() {
        let store = MemoryStore::new();
        let ledger = BackupLedger::new();
        store.write(PATH, "Start", &RegistryValue::Dword(2)).unwrap();

        ledger.capture_if_absent(&store, PATH, "Start").unwrap();

        // live value changes between captures; the ledger must not follow
        for live in [4u32, 3, 2] {
            store.write(PATH, "Start", &RegistryValue::Dword(live)).unwrap();
            ledger.capture_if_absent(&store, PATH, "Start").unwrap();
        }
        assert_eq!(ledger.get(PATH, "Start"), Some(RegistryValue::Dword(2)));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn snapshot_round_trip_preserves_entries() {
        let store = MemoryStore::new();
        let ledger = BackupLedger::new();
        store
            .write(PATH, "MenuShowDelay", &RegistryValue::Text("400".into()))
            .unwrap();
        ledger.capture_if_absent(&store, PATH, "MenuShowDelay").unwrap();
        ledger.capture_if_absent(&store, PATH, "Absent").unwrap();

        let dir = temp_dir("roundtrip");
        let path = ledger.persist_snapshot(&dir).unwrap();

        let restored = BackupLedger::new();
        assert_eq!(restored.load_snapshot(&path).unwrap(), 2);
        assert_eq!(
            restored.get(PATH, "MenuShowDelay"),
            Some(RegistryValue::Text("400".into()))
        );
        assert_eq!(restored.get(PATH, "Absent"), Some(RegistryValue::Missing));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn load_snapshot_never_overwrites_existing_captures() {
        let store = MemoryStore::new();
        let ledger = BackupLedger::new();
        store.write(PATH, "Start", &RegistryValue::Dword(2)).unwrap();
        ledger.capture_if_absent(&store, PATH, "Start").unwrap();

        let dir = temp_dir("no-overwrite");
        let snapshot = ledger.persist_snapshot(&dir).unwrap();

        // a second process captures a different live value, then loads the
        // older snapshot; its own capture must win
        let later = BackupLedger::new();
        let later_store = MemoryStore::new();
        later_store.write(PATH, "Start", &RegistryValue::Dword(4)).unwrap();
        later.capture_if_absent(&later_store, PATH, "Start").unwrap();

        assert_eq!(later.load_snapshot(&snapshot).unwrap(), 0);
        assert_eq!(later.get(PATH, "Start"), Some(RegistryValue::Dword(4)));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn capture_failure_leaves_ledger_unchanged() {
        struct FailingStore;
        impl ValueStore for FailingStore {
            fn read(
                &self,
                key_path: &str,
                _value_name: &str,
            ) -> Result<RegistryValue, crate::errors::StoreError> {
                Err(crate::errors::StoreError::AccessDenied(key_path.to_string()))
            }
            fn write(
                &self,
                _key_path: &str,
                _value_name: &str,
                _value: &RegistryValue,
            ) -> Result<(), crate::errors::StoreError> {
                Ok(())
            }
        }

        let ledger = BackupLedger::new();
        assert!(ledger.capture_if_absent(&FailingStore, PATH, "Start").is_err());
        assert!(ledger.is_empty());
    }
}
