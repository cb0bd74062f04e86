//! Normalizer configuration.

use crate::config::defaults::ScanDefaults;
use crate::exceptions::{
    ExceptionsStore, FixedPathStore, InMemoryStore, UniquePathStore, DEFAULT_EXCEPTIONS_PATH,
};

use std::path::PathBuf;
use std::sync::Arc;

/// How persisted exceptions are laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExceptionsStorage {
    /// Every request writes the same file. Concurrent requests race.
    FixedPath(PathBuf),

    /// Every request writes a new file inside the given directory.
    UniquePerRequest(PathBuf),

    /// Exceptions are kept in process memory.
    InMemory,
}

impl Default for ExceptionsStorage {
    fn default() -> Self {
        Self::FixedPath(PathBuf::from(DEFAULT_EXCEPTIONS_PATH))
    }
}

impl ExceptionsStorage {
    /// Builds the store described by this layout.
    pub fn build_store(&self) -> Arc<dyn ExceptionsStore> {
        match self {
            Self::FixedPath(path) => Arc::new(FixedPathStore::new(path.clone())),
            Self::UniquePerRequest(dir) => Arc::new(UniquePathStore::new(dir.clone())),
            Self::InMemory => Arc::new(InMemoryStore::new()),
        }
    }
}

/// Configuration for the request normalizer.
#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    /// Template every configuration starts from.
    pub defaults: ScanDefaults,

    /// Where supplied exceptions are persisted.
    pub exceptions: ExceptionsStorage,

    /// Whether to emit an audit event per normalized request.
    pub audit_enabled: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            defaults: ScanDefaults::default(),
            exceptions: ExceptionsStorage::default(),
            audit_enabled: true,
        }
    }
}

impl NormalizerConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration whose defaults come from the environment.
    pub fn from_env() -> Self {
        Self {
            defaults: ScanDefaults::from_env(),
            ..Self::default()
        }
    }

    /// Sets the defaults template.
    pub fn with_defaults(mut self, defaults: ScanDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Sets the exceptions storage layout.
    pub fn with_exceptions(mut self, storage: ExceptionsStorage) -> Self {
        self.exceptions = storage;
        self
    }

    /// Enables or disables audit events.
    pub fn with_audit(mut self, enabled: bool) -> Self {
        self.audit_enabled = enabled;
        self
    }
}
