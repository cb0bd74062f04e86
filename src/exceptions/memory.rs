//! In-memory exceptions storage.

use crate::core::error::{ExceptionsError, ExceptionsResult};
use crate::core::ExceptionPolicy;
use crate::exceptions::traits::{
    decode_exceptions, encode_exceptions, ExceptionsLocation, ExceptionsStore,
};

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// Keeps persisted exception lists in memory.
///
/// Each call gets its own virtual location (`memory/exceptions-<n>.json`).
/// Useful for tests and for embedding the normalizer next to an engine in
/// the same process. Entries live until [`take`](ExceptionsStore::take) or
/// [`remove`](InMemoryStore::remove) releases them, so a long-running
/// engine must consume each list exactly once. A read-only store rejects every write, which lets
/// callers exercise the degraded path without touching the filesystem.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<PathBuf, Vec<u8>>>,
    next_id: AtomicU64,
    read_only: bool,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that fails every write.
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    /// Returns the number of stored lists.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Returns `true` if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the raw JSON stored at `location`.
    pub fn raw(&self, location: &ExceptionsLocation) -> Option<Vec<u8>> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(location.as_path())
            .cloned()
    }

    /// Drops the list stored at `location`, returning `true` if it existed.
    pub fn remove(&self, location: &ExceptionsLocation) -> bool {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(location.as_path())
            .is_some()
    }
}

impl ExceptionsStore for InMemoryStore {
    fn persist(&self, exceptions: &[ExceptionPolicy]) -> ExceptionsResult<ExceptionsLocation> {
        let data = encode_exceptions(exceptions)?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let path = PathBuf::from(format!("memory/exceptions-{}.json", id));

        if self.read_only {
            return Err(ExceptionsError::write_failed(
                path,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "store is read-only"),
            ));
        }

        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(path.clone(), data);

        Ok(ExceptionsLocation::new(path))
    }

    fn load(&self, location: &ExceptionsLocation) -> ExceptionsResult<Vec<ExceptionPolicy>> {
        let data = self
            .raw(location)
            .ok_or_else(|| ExceptionsError::not_found(location.to_string()))?;
        decode_exceptions(&data)
    }

    fn take(&self, location: &ExceptionsLocation) -> ExceptionsResult<Vec<ExceptionPolicy>> {
        let data = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(location.as_path())
            .ok_or_else(|| ExceptionsError::not_found(location.to_string()))?;
        decode_exceptions(&data)
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_roundtrip() {
        let store = InMemoryStore::new();
        assert!(store.is_empty());

        let location = store.persist(&[ExceptionPolicy::new("e1")]).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.raw(&location).unwrap(), br#"[{"name":"e1"}]"#);
        assert_eq!(store.load(&location).unwrap(), vec![ExceptionPolicy::new("e1")]);
    }

    #[test]
    fn test_in_memory_locations_are_unique() {
        let store = InMemoryStore::new();
        let a = store.persist(&[]).unwrap();
        let b = store.persist(&[]).unwrap();
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let store = InMemoryStore::read_only();
        let err = store.persist(&[ExceptionPolicy::new("e1")]).unwrap_err();
        assert!(matches!(err, ExceptionsError::WriteFailed { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn test_take_releases_entry() {
        let store = InMemoryStore::new();
        let first = store.persist(&[ExceptionPolicy::new("e1")]).unwrap();
        let second = store.persist(&[ExceptionPolicy::new("e2")]).unwrap();
        assert_eq!(store.len(), 2);

        assert_eq!(store.take(&first).unwrap(), vec![ExceptionPolicy::new("e1")]);
        assert_eq!(store.len(), 1);
        assert!(matches!(
            store.take(&first).unwrap_err(),
            ExceptionsError::NotFound { .. }
        ));

        assert!(store.remove(&second));
        assert!(!store.remove(&second));
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_unknown_location() {
        let store = InMemoryStore::new();
        let err = store
            .load(&ExceptionsLocation::from("memory/exceptions-99.json"))
            .unwrap_err();
        assert!(matches!(err, ExceptionsError::NotFound { .. }));
    }
}
