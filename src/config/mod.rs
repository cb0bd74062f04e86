//! Configuration for the normalizer.
//!
//! [`ScanDefaults`] is the template every scan configuration starts from,
//! optionally loaded from `SCAN_*` environment variables.
//! [`NormalizerConfig`] bundles it with the exceptions storage layout.

pub mod env;

mod defaults;
mod normalizer;

pub use defaults::{
    ScanDefaults, ENV_ACCESS_KEY, ENV_ACCOUNT, ENV_ENABLE_HOST_SCANNER, ENV_EXCLUDE_NAMESPACES,
    ENV_FAIL_THRESHOLD, ENV_FORMAT, ENV_FORMAT_VERSION, ENV_INCLUDE_NAMESPACES, ENV_KEEP_LOCAL,
    ENV_SUBMIT, ENV_USE_ARTIFACTS_FROM,
};
pub use normalizer::{ExceptionsStorage, NormalizerConfig};
