//! Save/load persistence
//!
//! Features:
//! - `Storage` capability over a flat key-value store
//! - LocalStorage backend on the web, in-memory backend elsewhere
//! - Typed JSON helpers; loads fall back to defaults on any failure

#[cfg(target_arch = "wasm32")]
pub mod local;
pub mod memory;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;
pub use memory::MemoryStorage;

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Failure talking to a storage backend
#[derive(Debug)]
pub enum StorageError {
    /// No backend (e.g. LocalStorage disabled by the browser)
    Unavailable,
    /// The backend rejected the operation
    Backend(String),
    /// Value could not be encoded or decoded
    Serialize(serde_json::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable => write!(f, "storage unavailable"),
            StorageError::Backend(msg) => write!(f, "storage backend error: {msg}"),
            StorageError::Serialize(e) => write!(f, "invalid stored data: {e}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Serialize(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialize(e)
    }
}

/// Synchronous key-value storage capability
pub trait Storage {
    /// Raw value stored under `key`, `None` if absent
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Decode the JSON value under `key`
pub fn fetch<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Result<Option<T>, StorageError> {
    match storage.read(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Encode `value` as JSON under `key`
pub fn store<T: Serialize>(storage: &mut dyn Storage, key: &str, value: &T) -> Result<(), StorageError> {
    let json = serde_json::to_string(value)?;
    storage.write(key, &json)
}

/// Load `key`, falling back to `T::default()` when absent or unreadable
///
/// Failures are logged and never propagated.
pub fn load_or_default<T: DeserializeOwned + Default>(storage: &dyn Storage, key: &str) -> T {
    match fetch(storage, key) {
        Ok(Some(value)) => value,
        Ok(None) => {
            log::info!("Nothing stored under '{}', using defaults", key);
            T::default()
        }
        Err(e) => {
            log::error!("Failed to load '{}': {}", key, e);
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Sample {
        value: u32,
    }

    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable)
        }

        fn write(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Backend("quota exceeded".to_string()))
        }
    }

    #[test]
    fn test_store_then_fetch() {
        let mut storage = MemoryStorage::new();
        store(&mut storage, "k", &Sample { value: 7 }).unwrap();
        let loaded: Option<Sample> = fetch(&storage, "k").unwrap();
        assert_eq!(loaded, Some(Sample { value: 7 }));
    }

    #[test]
    fn test_missing_key_defaults() {
        let storage = MemoryStorage::new();
        let loaded: Sample = load_or_default(&storage, "missing");
        assert_eq!(loaded, Sample::default());
    }

    #[test]
    fn test_corrupt_value_defaults() {
        let mut storage = MemoryStorage::new();
        storage.write("k", "{not json").unwrap();
        assert!(matches!(
            fetch::<Sample>(&storage, "k"),
            Err(StorageError::Serialize(_))
        ));
        let loaded: Sample = load_or_default(&storage, "k");
        assert_eq!(loaded, Sample::default());
    }

    #[test]
    fn test_broken_backend_is_swallowed() {
        let mut storage = BrokenStorage;
        let loaded: Sample = load_or_default(&storage, "k");
        assert_eq!(loaded, Sample::default());
        assert!(matches!(
            store(&mut storage, "k", &Sample { value: 1 }),
            Err(StorageError::Backend(_))
        ));
    }

    #[test]
    fn test_error_display() {
        let err = StorageError::Backend("quota exceeded".to_string());
        assert_eq!(err.to_string(), "storage backend error: quota exceeded");
        assert_eq!(StorageError::Unavailable.to_string(), "storage unavailable");
    }
}
