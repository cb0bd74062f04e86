//! # Scanintake
//!
//! Turns inbound posture-scan requests into the scan configurations a
//! scanning engine consumes.
//!
//! ## Overview
//!
//! A scan request arrives over HTTP with every field optional. Scanintake:
//!
//! - Starts from a defaults template (optionally loaded from the environment)
//! - Resolves the targets: frameworks, controls, or "scan everything"
//! - Copies only the request fields that carry a value
//! - Keeps tri-state flags distinct from explicit `false`
//! - Persists supplied exception policies and records where they landed
//! - Emits structured audit events through `tracing`
//!
//! ## Quick Start
//!
//! ```rust
//! use scanintake::{RequestNormalizer, ScanRequest};
//! use scanintake::exceptions::InMemoryStore;
//!
//! let normalizer = RequestNormalizer::builder()
//!     .with_store(InMemoryStore::new())
//!     .build();
//!
//! let request = ScanRequest::new()
//!     .with_target("Framework", ["nsa", "all"])
//!     .with_keep_local(true);
//! let config = normalizer.build_configuration(&request);
//!
//! assert!(config.framework_scan);
//! assert!(config.scan_all);
//! assert_eq!(config.policy_names(), vec!["nsa"]);
//! assert!(config.local);
//! ```
//!
//! ## Exceptions storage
//!
//! By default exceptions are written to `/tmp/exceptions.json`, the path
//! existing engines read. Every request shares that file, so overlapping
//! requests can see each other's exceptions. Select
//! [`config::ExceptionsStorage::UniquePerRequest`] to give each request its
//! own file instead.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod audit;
pub mod config;
pub mod configuration;
pub mod core;
pub mod exceptions;
pub mod normalizer;
pub mod request;

// Re-export commonly used types at the crate root
pub use crate::core::{
    ArtifactSource, ExceptionPolicy, ExceptionsError, PosturePolicy, RequestError, ScanObject,
    TargetKind,
};

pub use crate::config::{ExceptionsStorage, NormalizerConfig, ScanDefaults};
pub use crate::configuration::{PolicyIdentifier, ScanConfiguration};
pub use crate::exceptions::{ExceptionsLocation, ExceptionsStore};
pub use crate::normalizer::{RequestNormalizer, TargetSelection};
pub use crate::request::ScanRequest;

/// Prelude module for convenient imports.
///
/// ```rust
/// use scanintake::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{ExceptionsStorage, NormalizerConfig, ScanDefaults};
    pub use crate::configuration::{PolicyIdentifier, ScanConfiguration};
    pub use crate::core::{ArtifactSource, ExceptionPolicy, ScanObject, TargetKind};
    pub use crate::exceptions::{ExceptionsLocation, ExceptionsStore};
    pub use crate::normalizer::RequestNormalizer;
    pub use crate::request::ScanRequest;
}
