//! Core types for the scanintake library.
//!
//! - [`types`] - Target kinds, artifact sources and pass-through records
//! - [`error`] - Structured error types

pub mod error;
pub mod types;

pub use error::{ExceptionsError, ExceptionsResult, RequestError};
pub use types::{ArtifactSource, ExceptionPolicy, PosturePolicy, ScanObject, TargetKind};

/// Masks a secret for `Debug` output, keeping only whether it is set.
pub(crate) fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        ""
    } else {
        "[REDACTED]"
    }
}
