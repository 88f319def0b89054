// src/errors.rs

use thiserror::Error;

/// Failures of the value store. Absence of a key or value is never an error;
/// it is reported as [`crate::store::RegistryValue::Missing`].
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid registry key format: {0}")]
    InvalidKeyFormat(String),

    #[error("Unsupported registry hive: {0}")]
    UnsupportedHive(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Failed to open registry key: {0}")]
    KeyOpenError(String),

    #[error("Failed to create registry key: {0}")]
    CreateError(String),

    #[error("Failed to read registry value: {0}")]
    ReadValueError(String),

    #[error("Failed to set registry value: {0}")]
    SetValueError(String),

    #[error("Failed to delete registry value: {0}")]
    DeleteValueError(String),
}
