//! The default scan configuration template.

use crate::config::env::{parse_bool, parse_csv};
use crate::core::{redact, ArtifactSource};

use std::fmt;
use std::path::PathBuf;

/// Environment variable overriding the account ID.
pub const ENV_ACCOUNT: &str = "SCAN_ACCOUNT";
/// Environment variable overriding the access key.
pub const ENV_ACCESS_KEY: &str = "SCAN_ACCESS_KEY";
/// Environment variable listing excluded namespaces (comma-separated).
pub const ENV_EXCLUDE_NAMESPACES: &str = "SCAN_EXCLUDE_NAMESPACES";
/// Environment variable listing included namespaces (comma-separated).
pub const ENV_INCLUDE_NAMESPACES: &str = "SCAN_INCLUDE_NAMESPACES";
/// Environment variable overriding the output format.
pub const ENV_FORMAT: &str = "SCAN_FORMAT";
/// Environment variable overriding the output format version.
pub const ENV_FORMAT_VERSION: &str = "SCAN_FORMAT_VERSION";
/// Environment variable overriding the failure threshold.
pub const ENV_FAIL_THRESHOLD: &str = "SCAN_FAIL_THRESHOLD";
/// Environment variable overriding the keep-local flag.
pub const ENV_KEEP_LOCAL: &str = "SCAN_KEEP_LOCAL";
/// Environment variable overriding the submit flag.
pub const ENV_SUBMIT: &str = "SCAN_SUBMIT";
/// Environment variable overriding the host-scanner flag.
pub const ENV_ENABLE_HOST_SCANNER: &str = "SCAN_ENABLE_HOST_SCANNER";
/// Environment variable pointing at a directory of pre-fetched artifacts.
pub const ENV_USE_ARTIFACTS_FROM: &str = "SCAN_USE_ARTIFACTS_FROM";

/// Values every scan configuration starts from before a request is applied.
///
/// Request fields only ever overwrite these when they carry a value, so
/// whatever is set here is what an empty request produces.
#[derive(Clone, PartialEq)]
pub struct ScanDefaults {
    /// Account ID.
    pub account_id: String,

    /// Access key.
    pub access_key: String,

    /// Comma-joined excluded namespaces.
    pub excluded_namespaces: String,

    /// Comma-joined included namespaces.
    pub include_namespaces: String,

    /// Output format.
    pub format: String,

    /// Output format version.
    pub format_version: String,

    /// Compliance score (percent) below which the scan is reported as failed.
    pub fail_threshold: f32,

    /// Keep results local.
    pub local: bool,

    /// Submit results.
    pub submit: bool,

    /// Host-scanner flag; `None` leaves the decision to the engine.
    pub host_scanner: Option<bool>,

    /// Artifact source; `None` means download from the backend.
    pub artifact_source: Option<ArtifactSource>,
}

impl Default for ScanDefaults {
    fn default() -> Self {
        Self {
            account_id: String::new(),
            access_key: String::new(),
            excluded_namespaces: String::new(),
            include_namespaces: String::new(),
            format: "json".to_string(),
            format_version: "v2".to_string(),
            fail_threshold: 100.0,
            local: false,
            submit: false,
            host_scanner: None,
            artifact_source: None,
        }
    }
}

impl ScanDefaults {
    /// Creates the built-in defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds defaults from the process environment.
    ///
    /// See the `ENV_*` constants for the recognized variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds defaults from an arbitrary variable lookup.
    ///
    /// Blank values are ignored. Values that fail to parse are logged and
    /// ignored, leaving the built-in default in place.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let get_bool = |name: &str| {
            get(name).and_then(|raw| {
                let parsed = parse_bool(&raw);
                if parsed.is_none() {
                    tracing::warn!(variable = name, value = %raw, "Ignoring invalid boolean");
                }
                parsed
            })
        };

        let mut defaults = Self::default();

        if let Some(account) = get(ENV_ACCOUNT) {
            defaults.account_id = account;
        }
        if let Some(key) = get(ENV_ACCESS_KEY) {
            defaults.access_key = key;
        }
        if let Some(raw) = get(ENV_EXCLUDE_NAMESPACES) {
            defaults.excluded_namespaces = parse_csv(&raw).join(",");
        }
        if let Some(raw) = get(ENV_INCLUDE_NAMESPACES) {
            defaults.include_namespaces = parse_csv(&raw).join(",");
        }
        if let Some(format) = get(ENV_FORMAT) {
            defaults.format = format;
        }
        if let Some(version) = get(ENV_FORMAT_VERSION) {
            defaults.format_version = version;
        }
        if let Some(raw) = get(ENV_FAIL_THRESHOLD) {
            match raw.trim().parse::<f32>() {
                Ok(threshold) if (0.0..=100.0).contains(&threshold) => {
                    defaults.fail_threshold = threshold;
                }
                _ => {
                    tracing::warn!(variable = ENV_FAIL_THRESHOLD, value = %raw, "Ignoring invalid threshold");
                }
            }
        }
        if let Some(local) = get_bool(ENV_KEEP_LOCAL) {
            defaults.local = local;
        }
        if let Some(submit) = get_bool(ENV_SUBMIT) {
            defaults.submit = submit;
        }
        if let Some(enabled) = get_bool(ENV_ENABLE_HOST_SCANNER) {
            defaults.host_scanner = Some(enabled);
        }
        if let Some(dir) = get(ENV_USE_ARTIFACTS_FROM) {
            defaults.artifact_source = Some(ArtifactSource::Directory(PathBuf::from(dir)));
        }

        defaults
    }

    /// Sets the account ID.
    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = account_id.into();
        self
    }

    /// Sets the access key.
    pub fn with_access_key(mut self, access_key: impl Into<String>) -> Self {
        self.access_key = access_key.into();
        self
    }

    /// Sets the output format.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Sets the failure threshold.
    pub fn with_fail_threshold(mut self, threshold: f32) -> Self {
        self.fail_threshold = threshold;
        self
    }

    /// Sets the keep-local flag.
    pub fn with_local(mut self, local: bool) -> Self {
        self.local = local;
        self
    }

    /// Sets the submit flag.
    pub fn with_submit(mut self, submit: bool) -> Self {
        self.submit = submit;
        self
    }

    /// Sets the host-scanner flag.
    pub fn with_host_scanner(mut self, enabled: bool) -> Self {
        self.host_scanner = Some(enabled);
        self
    }

    /// Sets the artifact source.
    pub fn with_artifact_source(mut self, source: ArtifactSource) -> Self {
        self.artifact_source = Some(source);
        self
    }

    /// Defaults for clusters without backend access: keep everything local
    /// and never submit.
    pub fn offline() -> Self {
        Self {
            local: true,
            submit: false,
            artifact_source: Some(ArtifactSource::LocalCache),
            ..Self::default()
        }
    }
}

impl fmt::Debug for ScanDefaults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanDefaults")
            .field("account_id", &self.account_id)
            .field("access_key", &redact(&self.access_key))
            .field("excluded_namespaces", &self.excluded_namespaces)
            .field("include_namespaces", &self.include_namespaces)
            .field("format", &self.format)
            .field("format_version", &self.format_version)
            .field("fail_threshold", &self.fail_threshold)
            .field("local", &self.local)
            .field("submit", &self.submit)
            .field("host_scanner", &self.host_scanner)
            .field("artifact_source", &self.artifact_source)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_builtin_defaults() {
        let defaults = ScanDefaults::default();
        assert_eq!(defaults.format, "json");
        assert_eq!(defaults.format_version, "v2");
        assert_eq!(defaults.fail_threshold, 100.0);
        assert!(!defaults.local);
        assert!(!defaults.submit);
        assert_eq!(defaults.host_scanner, None);
        assert_eq!(defaults.artifact_source, None);
    }

    #[test]
    fn test_empty_environment_keeps_builtin_defaults() {
        let defaults = ScanDefaults::from_lookup(|_| None);
        assert_eq!(defaults, ScanDefaults::default());
    }

    #[test]
    fn test_environment_overrides() {
        let defaults = ScanDefaults::from_lookup(lookup_from(&[
            (ENV_ACCOUNT, "acc-1"),
            (ENV_EXCLUDE_NAMESPACES, "kube-system, kube-public"),
            (ENV_FORMAT, "junit"),
            (ENV_FAIL_THRESHOLD, "80"),
            (ENV_KEEP_LOCAL, "yes"),
            (ENV_SUBMIT, "off"),
            (ENV_ENABLE_HOST_SCANNER, "false"),
            (ENV_USE_ARTIFACTS_FROM, "/artifacts"),
        ]));

        assert_eq!(defaults.account_id, "acc-1");
        assert_eq!(defaults.excluded_namespaces, "kube-system,kube-public");
        assert_eq!(defaults.format, "junit");
        assert_eq!(defaults.fail_threshold, 80.0);
        assert!(defaults.local);
        assert!(!defaults.submit);
        assert_eq!(defaults.host_scanner, Some(false));
        assert_eq!(
            defaults.artifact_source,
            Some(ArtifactSource::Directory(PathBuf::from("/artifacts")))
        );
    }

    #[test]
    fn test_invalid_values_are_ignored() {
        let defaults = ScanDefaults::from_lookup(lookup_from(&[
            (ENV_KEEP_LOCAL, "sometimes"),
            (ENV_FAIL_THRESHOLD, "150"),
            (ENV_FORMAT, "   "),
        ]));

        assert!(!defaults.local);
        assert_eq!(defaults.fail_threshold, 100.0);
        assert_eq!(defaults.format, "json");
    }

    #[test]
    fn test_offline_preset() {
        let defaults = ScanDefaults::offline();
        assert!(defaults.local);
        assert_eq!(defaults.artifact_source, Some(ArtifactSource::LocalCache));
    }

    #[test]
    fn test_debug_redacts_access_key() {
        let defaults = ScanDefaults::default().with_access_key("hunter2");
        assert!(!format!("{:?}", defaults).contains("hunter2"));
    }
}
