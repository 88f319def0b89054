// src/store.rs

use std::{collections::HashMap, fmt, sync::Mutex};

use serde::{Deserialize, Serialize};

use crate::errors::StoreError;

/// Enumeration of supported registry value types, plus the absent marker.
///
/// `Missing` doubles as "the value does not exist": reads return it instead of
/// failing, and writing it deletes the named value.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum RegistryValue {
    Dword(u32),
    Qword(u64),
    Text(String),
    MultiText(Vec<String>),
    Binary(Vec<u8>),
    Missing,
}

impl RegistryValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, RegistryValue::Missing)
    }
}

impl fmt::Display for RegistryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryValue::Dword(v) => write!(f, "Dword({})", v),
            RegistryValue::Qword(v) => write!(f, "Qword({})", v),
            RegistryValue::Text(v) => write!(f, "Text({})", v),
            RegistryValue::MultiText(v) => write!(f, "MultiText({:?})", v),
            RegistryValue::Binary(v) => write!(f, "Binary({:?})", v),
            RegistryValue::Missing => write!(f, "Missing"),
        }
    }
}

/// Top-level registry hives addressable through a key path prefix.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Hive {
    CurrentUser,
    LocalMachine,
    ClassesRoot,
    Users,
    CurrentConfig,
}

/// Splits a full key path (e.g. `HKEY_LOCAL_MACHINE\SYSTEM\...`) into its hive
/// and subkey path. Both the long and the abbreviated alias of each hive are
/// accepted, case-insensitively.
///
/// A path without a recognizable root is an error. There is deliberately no
/// fallback hive: a typo in a tweak definition must surface as
/// [`StoreError::UnsupportedHive`], not silently land in HKEY_CURRENT_USER.
pub fn parse_key_path(path: &str) -> Result<(Hive, &str), StoreError> {
    let (root, subkey) = match path.split_once('\\') {
        Some((root, subkey)) if !subkey.is_empty() => (root, subkey),
        _ => return Err(StoreError::InvalidKeyFormat(path.to_string())),
    };
    let hive = match root.to_uppercase().as_str() {
        "HKEY_CURRENT_USER" | "HKCU" => Hive::CurrentUser,
        "HKEY_LOCAL_MACHINE" | "HKLM" => Hive::LocalMachine,
        "HKEY_CLASSES_ROOT" | "HKCR" => Hive::ClassesRoot,
        "HKEY_USERS" | "HKU" => Hive::Users,
        "HKEY_CURRENT_CONFIG" | "HKCC" => Hive::CurrentConfig,
        other => return Err(StoreError::UnsupportedHive(other.to_string())),
    };
    Ok((hive, subkey))
}

/// A settings hive holding named values under hierarchical key paths.
///
/// The single seam between the tweak engine and the operating system: the live
/// implementation is [`crate::utils::registry::RegistryStore`], while tests
/// and dry runs use [`MemoryStore`].
pub trait ValueStore: Send + Sync {
    /// Reads a single value. A missing key or value yields
    /// [`RegistryValue::Missing`], never an error.
    fn read(&self, key_path: &str, value_name: &str) -> Result<RegistryValue, StoreError>;

    /// Writes a single value, creating intermediate keys as needed. Writing
    /// [`RegistryValue::Missing`] deletes the value; deleting an already
    /// absent value succeeds.
    fn write(
        &self,
        key_path: &str,
        value_name: &str,
        value: &RegistryValue,
    ) -> Result<(), StoreError>;
}

/// In-memory [`ValueStore`] used by tests and the CLI dry-run mode.
///
/// Paths are validated through [`parse_key_path`] so malformed catalog entries
/// fail here the same way they would against the live registry.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<(String, String), RegistryValue>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(key_path: &str, value_name: &str) -> (String, String) {
        (key_path.to_uppercase(), value_name.to_string())
    }
}

impl ValueStore for MemoryStore {
    fn read(&self, key_path: &str, value_name: &str) -> Result<RegistryValue, StoreError> {
        parse_key_path(key_path)?;
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values
            .get(&Self::key(key_path, value_name))
            .cloned()
            .unwrap_or(RegistryValue::Missing))
    }

    fn write(
        &self,
        key_path: &str,
        value_name: &str,
        value: &RegistryValue,
    ) -> Result<(), StoreError> {
        parse_key_path(key_path)?;
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        if value.is_missing() {
            values.remove(&Self::key(key_path, value_name));
        } else {
            values.insert(Self::key(key_path, value_name), value.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_resolves_long_and_short_aliases() {
        let cases = [
            ("HKEY_CURRENT_USER\\Software\\Test", Hive::CurrentUser),
            ("HKCU\\Software\\Test", Hive::CurrentUser),
            ("hklm\\SYSTEM\\CurrentControlSet", Hive::LocalMachine),
            ("HKEY_CLASSES_ROOT\\.txt", Hive::ClassesRoot),
            ("HKU\\.DEFAULT", Hive::Users),
            ("HKCC\\System", Hive::CurrentConfig),
        ];
        for (path, expected) in cases {
            let (hive, _) = parse_key_path(path).expect(path);
            assert_eq!(hive, expected, "path '{}'", path);
        }
    }

    #[test]
    fn parse_preserves_subkey_path() {
        let (_, subkey) =
            parse_key_path("HKEY_LOCAL_MACHINE\\SYSTEM\\CurrentControlSet\\Services\\SysMain")
                .unwrap();
        assert_eq!(subkey, "SYSTEM\\CurrentControlSet\\Services\\SysMain");
    }

    #[test]
    fn parse_rejects_unrecognized_roots() {
        assert!(matches!(
            parse_key_path("HKEY_PERFORMANCE_DATA\\Counters"),
            Err(StoreError::UnsupportedHive(_))
        ));
        assert!(matches!(
            parse_key_path("Software\\NoRoot"),
            Err(StoreError::UnsupportedHive(_))
        ));
    }

    #[test]
    fn parse_rejects_rootless_paths() {
        for path in ["", "HKEY_CURRENT_USER", "HKCU\\"] {
            assert!(
                matches!(parse_key_path(path), Err(StoreError::InvalidKeyFormat(_))),
                "path '{}' should be invalid",
                path
            );
        }
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();
        let path = "HKCU\\Software\\TweakHubTest";

        // never set -> absent marker, not an error
        assert_eq!(store.read(path, "Value").unwrap(), RegistryValue::Missing);

        store
            .write(path, "Value", &RegistryValue::Dword(42))
            .unwrap();
        assert_eq!(store.read(path, "Value").unwrap(), RegistryValue::Dword(42));

        // writing the absent marker deletes
        store.write(path, "Value", &RegistryValue::Missing).unwrap();
        assert_eq!(store.read(path, "Value").unwrap(), RegistryValue::Missing);
    }

    #[test]
    fn memory_store_is_case_insensitive_on_key_paths() {
        let store = MemoryStore::new();
        store
            .write(
                "HKCU\\Software\\TweakHubTest",
                "Value",
                &RegistryValue::Text("x".into()),
            )
            .unwrap();
        assert_eq!(
            store
                .read("hkcu\\SOFTWARE\\tweakhubtest", "Value")
                .unwrap(),
            RegistryValue::Text("x".into())
        );
    }

    #[test]
    fn memory_store_rejects_malformed_paths() {
        let store = MemoryStore::new();
        assert!(store.read("NotARoot\\Key", "Value").is_err());
        assert!(store
            .write("NotARoot\\Key", "Value", &RegistryValue::Dword(1))
            .is_err());
    }
}
