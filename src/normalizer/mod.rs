//! Normalization of scan requests into scan configurations.
//!
//! The normalizer applies, in order: the defaults template, target
//! selection, sparse copy of the request's plain fields, the tri-state
//! flags, the single-object descriptor, and finally exception persistence.

mod request_normalizer;
mod target;

pub use request_normalizer::{RequestNormalizer, RequestNormalizerBuilder};
pub use target::{TargetSelection, SCAN_ALL_NAME};
