//! Error types for the scanintake library.
//!
//! Normalizing a request never fails. The only fallible steps are decoding a
//! raw request body and persisting exception policies, and both are reported
//! through the typed errors below.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for exception-policy persistence.
#[derive(Debug, Error)]
pub enum ExceptionsError {
    /// The exception list could not be converted to JSON.
    #[error("failed to marshal exceptions: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },

    /// Writing the exceptions file failed.
    #[error("failed to write exceptions file '{}' to disk: {}", .path.display(), .source)]
    WriteFailed {
        /// Path that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// No exceptions are stored at the given location.
    #[error("no exceptions stored at '{location}'")]
    NotFound {
        /// The location that was looked up.
        location: String,
    },

    /// Stored exceptions could not be decoded.
    #[error("failed to decode stored exceptions: {reason}")]
    Deserialization {
        /// Description of the decoding failure.
        reason: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExceptionsError {
    /// Returns `true` if the failure came from the storage medium rather
    /// than from the records themselves.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, Self::WriteFailed { .. } | Self::Io(_) | Self::NotFound { .. })
    }

    /// Creates a `Serialization` error.
    pub fn serialization(reason: impl Into<String>) -> Self {
        Self::Serialization {
            reason: reason.into(),
        }
    }

    /// Creates a `WriteFailed` error.
    pub fn write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteFailed {
            path: path.into(),
            source,
        }
    }

    /// Creates a `NotFound` error.
    pub fn not_found(location: impl Into<String>) -> Self {
        Self::NotFound {
            location: location.into(),
        }
    }
}

/// Error type for decoding inbound scan requests.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The request body is not a valid scan request document.
    #[error("invalid scan request: {reason}")]
    InvalidJson {
        /// Description of what failed to parse.
        reason: String,
    },
}

impl From<serde_json::Error> for RequestError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidJson {
            reason: err.to_string(),
        }
    }
}

/// A specialized `Result` type for exception persistence.
pub type ExceptionsResult<T> = Result<T, ExceptionsError>;
