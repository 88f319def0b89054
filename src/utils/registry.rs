// src/utils/registry.rs

use std::io;

use tracing::trace;
use winreg::{
    enums::{
        RegType::{REG_BINARY, REG_DWORD, REG_EXPAND_SZ, REG_MULTI_SZ, REG_QWORD, REG_SZ},
        HKEY_CLASSES_ROOT, HKEY_CURRENT_CONFIG, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, HKEY_USERS,
        KEY_READ, KEY_WRITE,
    },
    RegKey, RegValue,
};

use crate::{
    errors::StoreError,
    store::{parse_key_path, Hive, RegistryValue, ValueStore},
};

/// Live Windows registry backing for [`ValueStore`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RegistryStore;

impl RegistryStore {
    pub fn new() -> Self {
        Self
    }
}

fn hive_key(hive: Hive) -> RegKey {
    RegKey::predef(match hive {
        Hive::CurrentUser => HKEY_CURRENT_USER,
        Hive::LocalMachine => HKEY_LOCAL_MACHINE,
        Hive::ClassesRoot => HKEY_CLASSES_ROOT,
        Hive::Users => HKEY_USERS,
        Hive::CurrentConfig => HKEY_CURRENT_CONFIG,
    })
}

impl ValueStore for RegistryStore {
    fn read(&self, key_path: &str, value_name: &str) -> Result<RegistryValue, StoreError> {
        let (hive, subkey_path) = parse_key_path(key_path)?;
        let subkey = match hive_key(hive).open_subkey_with_flags(subkey_path, KEY_READ) {
            Ok(subkey) => subkey,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(RegistryValue::Missing),
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                return Err(StoreError::AccessDenied(key_path.to_string()))
            }
            Err(e) => return Err(StoreError::KeyOpenError(format!("{}: {}", key_path, e))),
        };

        match subkey.get_raw_value(value_name) {
            Ok(raw) => decode_raw_value(&raw, value_name),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(RegistryValue::Missing),
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                Err(StoreError::AccessDenied(format!("{}\\{}", key_path, value_name)))
            }
            Err(e) => Err(StoreError::ReadValueError(format!(
                "'{}' in '{}': {}",
                value_name, key_path, e
            ))),
        }
    }

    fn write(
        &self,
        key_path: &str,
        value_name: &str,
        value: &RegistryValue,
    ) -> Result<(), StoreError> {
        let (hive, subkey_path) = parse_key_path(key_path)?;
        trace!("Writing {} to '{}\\{}'", value, key_path, value_name);

        if value.is_missing() {
            return delete_value(hive, subkey_path, key_path, value_name);
        }

        // create_subkey creates all intermediate keys if they don't exist
        let (key, _) = match hive_key(hive).create_subkey(subkey_path) {
            Ok(created) => created,
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                return Err(StoreError::AccessDenied(key_path.to_string()))
            }
            Err(e) => return Err(StoreError::CreateError(format!("{}: {}", key_path, e))),
        };

        let result = match value {
            RegistryValue::Dword(v) => key.set_value(value_name, v),
            RegistryValue::Qword(v) => key.set_value(value_name, v),
            RegistryValue::Text(s) => key.set_raw_value(
                value_name,
                &RegValue {
                    bytes: encode_utf16_z(s),
                    vtype: REG_SZ,
                },
            ),
            RegistryValue::MultiText(items) => key.set_raw_value(
                value_name,
                &RegValue {
                    bytes: encode_multi_sz(items),
                    vtype: REG_MULTI_SZ,
                },
            ),
            RegistryValue::Binary(data) => key.set_raw_value(
                value_name,
                &RegValue {
                    bytes: data.clone(),
                    vtype: REG_BINARY,
                },
            ),
            RegistryValue::Missing => unreachable!("handled above"),
        };

        match result {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                Err(StoreError::AccessDenied(format!("{}\\{}", key_path, value_name)))
            }
            Err(e) => Err(StoreError::SetValueError(format!(
                "'{}' in '{}': {}",
                value_name, key_path, e
            ))),
        }
    }
}

fn delete_value(
    hive: Hive,
    subkey_path: &str,
    key_path: &str,
    value_name: &str,
) -> Result<(), StoreError> {
    let subkey = match hive_key(hive).open_subkey_with_flags(subkey_path, KEY_WRITE) {
        Ok(subkey) => subkey,
        // neither the key nor the value exists; nothing to delete
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            return Err(StoreError::AccessDenied(key_path.to_string()))
        }
        Err(e) => return Err(StoreError::KeyOpenError(format!("{}: {}", key_path, e))),
    };
    match subkey.delete_value(value_name) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            Err(StoreError::AccessDenied(format!("{}\\{}", key_path, value_name)))
        }
        Err(e) => Err(StoreError::DeleteValueError(format!(
            "'{}' in '{}': {}",
            value_name, key_path, e
        ))),
    }
}

fn decode_raw_value(raw: &RegValue, value_name: &str) -> Result<RegistryValue, StoreError> {
    match raw.vtype {
        REG_DWORD => {
            if raw.bytes.len() >= 4 {
                Ok(RegistryValue::Dword(u32::from_le_bytes([
                    raw.bytes[0],
                    raw.bytes[1],
                    raw.bytes[2],
                    raw.bytes[3],
                ])))
            } else {
                Err(StoreError::ReadValueError(format!(
                    "REG_DWORD data too small for '{}'",
                    value_name
                )))
            }
        }
        REG_QWORD => {
            if raw.bytes.len() >= 8 {
                let mut bytes = [0u8; 8];
                bytes.copy_from_slice(&raw.bytes[..8]);
                Ok(RegistryValue::Qword(u64::from_le_bytes(bytes)))
            } else {
                Err(StoreError::ReadValueError(format!(
                    "REG_QWORD data too small for '{}'",
                    value_name
                )))
            }
        }
        REG_SZ | REG_EXPAND_SZ => Ok(RegistryValue::Text(decode_utf16_z(&raw.bytes))),
        REG_MULTI_SZ => Ok(RegistryValue::MultiText(decode_multi_sz(&raw.bytes))),
        REG_BINARY => Ok(RegistryValue::Binary(raw.bytes.clone())),
        other => Err(StoreError::ReadValueError(format!(
            "Unsupported registry value type {:?} for '{}'",
            other, value_name
        ))),
    }
}

fn utf16_units(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
        .collect()
}

fn decode_utf16_z(bytes: &[u8]) -> String {
    let units = utf16_units(bytes);
    let end = units.iter().position(|&u| u == 0).unwrap_or(units.len());
    String::from_utf16_lossy(&units[..end])
}

fn decode_multi_sz(bytes: &[u8]) -> Vec<String> {
    utf16_units(bytes)
        .split(|&u| u == 0)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| String::from_utf16_lossy(chunk))
        .collect()
}

fn encode_utf16_z(s: &str) -> Vec<u8> {
    s.encode_utf16()
        .chain(std::iter::once(0))
        .flat_map(|u| u.to_le_bytes())
        .collect()
}

fn encode_multi_sz(items: &[String]) -> Vec<u8> {
    let mut units: Vec<u16> = Vec::new();
    for item in items {
        units.extend(item.encode_utf16());
        units.push(0);
    }
    units.push(0);
    units.iter().flat_map(|u| u.to_le_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use lazy_static::lazy_static;

    use super::*;

    lazy_static! {
        static ref TEST_MUTEX: Mutex<()> = Mutex::new(());
    }

    const TEST_PATH: &str = "HKEY_CURRENT_USER\\Software\\TweakHubStoreTest";

    #[test]
    fn dword_round_trip() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let store = RegistryStore::new();

        store
            .write(TEST_PATH, "TestDword", &RegistryValue::Dword(42))
            .expect("Failed to set DWORD value");
        assert_eq!(
            store.read(TEST_PATH, "TestDword").expect("Failed to read"),
            RegistryValue::Dword(42)
        );

        store
            .write(TEST_PATH, "TestDword", &RegistryValue::Missing)
            .expect("Failed to delete");
        assert_eq!(
            store.read(TEST_PATH, "TestDword").expect("Failed to read"),
            RegistryValue::Missing
        );
    }

    #[test]
    fn text_round_trip() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let store = RegistryStore::new();

        let value = RegistryValue::Text("381b4222-f694-41f0-9685-ff5bb260df2e".into());
        store
            .write(TEST_PATH, "TestText", &value)
            .expect("Failed to set text value");
        assert_eq!(store.read(TEST_PATH, "TestText").expect("Failed to read"), value);

        store
            .write(TEST_PATH, "TestText", &RegistryValue::Missing)
            .expect("Failed to delete");
    }

    #[test]
    fn multi_text_round_trip() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let store = RegistryStore::new();

        let value = RegistryValue::MultiText(vec!["one".into(), "two".into()]);
        store
            .write(TEST_PATH, "TestMulti", &value)
            .expect("Failed to set multi value");
        assert_eq!(store.read(TEST_PATH, "TestMulti").expect("Failed to read"), value);

        store
            .write(TEST_PATH, "TestMulti", &RegistryValue::Missing)
            .expect("Failed to delete");
    }

    #[test]
    fn missing_key_and_value_read_as_absent() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let store = RegistryStore::new();

        assert_eq!(
            store
                .read("HKEY_CURRENT_USER\\Software\\TweakHubNoSuchKey", "Value")
                .expect("Missing key should not be an error"),
            RegistryValue::Missing
        );

        // deleting an absent value succeeds
        store
            .write(TEST_PATH, "NeverExisted", &RegistryValue::Missing)
            .expect("Deleting an absent value should succeed");
    }
}
