//! Exceptions store trait definition.

use crate::core::error::{ExceptionsError, ExceptionsResult};
use crate::core::ExceptionPolicy;

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::path::{Path, PathBuf};

/// Where a persisted exception list can be read back from.
///
/// The scan engine receives this location, not the records themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExceptionsLocation(pub PathBuf);

impl ExceptionsLocation {
    /// Creates a location from a path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Returns the location as a path.
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ExceptionsLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<PathBuf> for ExceptionsLocation {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}

impl From<&str> for ExceptionsLocation {
    fn from(path: &str) -> Self {
        Self(PathBuf::from(path))
    }
}

/// Storage for exception policies handed to the scan engine.
///
/// Implementations must be safe to share between concurrent requests.
/// Whether two requests can observe each other's exceptions depends on the
/// implementation; see [`FixedPathStore`](super::FixedPathStore).
///
/// # Example Implementation
///
/// ```rust,ignore
/// use scanintake::exceptions::{ExceptionsLocation, ExceptionsStore};
/// use scanintake::core::{ExceptionPolicy, ExceptionsResult};
///
/// #[derive(Debug)]
/// struct BucketStore {
///     // Your storage client
/// }
///
/// impl ExceptionsStore for BucketStore {
///     fn persist(&self, exceptions: &[ExceptionPolicy]) -> ExceptionsResult<ExceptionsLocation> {
///         // Upload the encoded records and return where they landed
///         todo!()
///     }
///
///     fn load(&self, location: &ExceptionsLocation) -> ExceptionsResult<Vec<ExceptionPolicy>> {
///         todo!()
///     }
/// }
/// ```
pub trait ExceptionsStore: Send + Sync + Debug {
    /// Persists the exception list and returns its location.
    fn persist(&self, exceptions: &[ExceptionPolicy]) -> ExceptionsResult<ExceptionsLocation>;

    /// Reads back an exception list previously persisted at `location`.
    fn load(&self, location: &ExceptionsLocation) -> ExceptionsResult<Vec<ExceptionPolicy>>;

    /// Reads back an exception list and releases its storage.
    ///
    /// Engines call this once they have consumed the list. The default
    /// leaves the stored copy in place.
    fn take(&self, location: &ExceptionsLocation) -> ExceptionsResult<Vec<ExceptionPolicy>> {
        self.load(location)
    }

    /// Returns a short name for logging.
    fn name(&self) -> &str {
        "exceptions-store"
    }
}

/// Encodes an exception list as a JSON array.
pub fn encode_exceptions(exceptions: &[ExceptionPolicy]) -> ExceptionsResult<Vec<u8>> {
    serde_json::to_vec(exceptions).map_err(|e| ExceptionsError::serialization(e.to_string()))
}

/// Decodes a JSON array of exception policies.
pub fn decode_exceptions(data: &[u8]) -> ExceptionsResult<Vec<ExceptionPolicy>> {
    serde_json::from_slice(data).map_err(|e| ExceptionsError::Deserialization {
        reason: e.to_string(),
    })
}
