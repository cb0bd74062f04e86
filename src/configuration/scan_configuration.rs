//! The scan configuration value object.

use crate::config::ScanDefaults;
use crate::core::{redact, ArtifactSource, ScanObject, TargetKind};
use crate::exceptions::ExceptionsLocation;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single framework or control the engine should evaluate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PolicyIdentifier {
    /// Framework or control name (e.g. `nsa`, `C-0034`).
    pub identifier: String,

    /// What kind of policy the identifier names.
    pub kind: TargetKind,
}

impl PolicyIdentifier {
    /// Creates a new identifier.
    pub fn new(identifier: impl Into<String>, kind: TargetKind) -> Self {
        Self {
            identifier: identifier.into(),
            kind,
        }
    }
}

/// A fully populated scan configuration.
///
/// Built from a [`ScanDefaults`] template and then updated field by field
/// from a request. The engine receives exceptions by location only.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanConfiguration {
    /// Account ID.
    pub account_id: String,

    /// Access key.
    #[serde(skip_serializing, default)]
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

    /// Where the engine loads policy artifacts from; `None` downloads them.
    pub artifact_source: Option<ArtifactSource>,

    /// Keep results local.
    pub local: bool,

    /// Submit results.
    pub submit: bool,

    /// Host-scanner flag; `None` when neither request nor defaults set it.
    pub host_scanner: Option<bool>,

    /// Single object to scan.
    pub scan_object: Option<ScanObject>,

    /// Whether `scan_object` describes a deleted object.
    pub is_deleted_scan_object: bool,

    /// Whether the targets are frameworks.
    pub framework_scan: bool,

    /// Whether every available framework is scanned.
    pub scan_all: bool,

    /// Explicit frameworks or controls to evaluate.
    pub policy_identifiers: Vec<PolicyIdentifier>,

    /// Location of the persisted exception policies.
    pub exceptions_path: Option<ExceptionsLocation>,
}

impl ScanConfiguration {
    /// Creates a configuration from the defaults template.
    pub fn from_defaults(defaults: &ScanDefaults) -> Self {
        Self {
            account_id: defaults.account_id.clone(),
            access_key: defaults.access_key.clone(),
            excluded_namespaces: defaults.excluded_namespaces.clone(),
            include_namespaces: defaults.include_namespaces.clone(),
            format: defaults.format.clone(),
            format_version: defaults.format_version.clone(),
            fail_threshold: defaults.fail_threshold,
            artifact_source: defaults.artifact_source.clone(),
            local: defaults.local,
            submit: defaults.submit,
            host_scanner: defaults.host_scanner,
            scan_object: None,
            is_deleted_scan_object: false,
            framework_scan: false,
            scan_all: false,
            policy_identifiers: Vec::new(),
            exceptions_path: None,
        }
    }

    /// Registers each name as a policy identifier of the given kind.
    ///
    /// Names already registered are skipped.
    pub fn set_policy_identifiers<I, S>(&mut self, names: I, kind: &TargetKind)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if self.contains_policy(&name) {
                continue;
            }
            self.policy_identifiers
                .push(PolicyIdentifier::new(name, kind.clone()));
        }
    }

    /// Returns `true` if a policy with this identifier is registered.
    pub fn contains_policy(&self, identifier: &str) -> bool {
        self.policy_identifiers
            .iter()
            .any(|p| p.identifier == identifier)
    }

    /// Returns the registered identifiers in order.
    pub fn policy_names(&self) -> Vec<&str> {
        self.policy_identifiers
            .iter()
            .map(|p| p.identifier.as_str())
            .collect()
    }

    /// Returns `true` if the scan targets individual controls.
    pub fn is_control_scan(&self) -> bool {
        !self.framework_scan
    }

    /// Returns `true` if exceptions were persisted for this scan.
    pub fn has_exceptions(&self) -> bool {
        self.exceptions_path.is_some()
    }
}

impl Default for ScanConfiguration {
    fn default() -> Self {
        Self::from_defaults(&ScanDefaults::default())
    }
}

impl fmt::Debug for ScanConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanConfiguration")
            .field("account_id", &self.account_id)
            .field("access_key", &redact(&self.access_key))
            .field("excluded_namespaces", &self.excluded_namespaces)
            .field("include_namespaces", &self.include_namespaces)
            .field("format", &self.format)
            .field("format_version", &self.format_version)
            .field("fail_threshold", &self.fail_threshold)
            .field("artifact_source", &self.artifact_source)
            .field("local", &self.local)
            .field("submit", &self.submit)
            .field("host_scanner", &self.host_scanner)
            .field("scan_object", &self.scan_object)
            .field("is_deleted_scan_object", &self.is_deleted_scan_object)
            .field("framework_scan", &self.framework_scan)
            .field("scan_all", &self.scan_all)
            .field("policy_identifiers", &self.policy_identifiers)
            .field("exceptions_path", &self.exceptions_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_defaults_copies_template() {
        let defaults = ScanDefaults::default()
            .with_account_id("acc-1")
            .with_local(true)
            .with_host_scanner(true);
        let config = ScanConfiguration::from_defaults(&defaults);

        assert_eq!(config.account_id, "acc-1");
        assert!(config.local);
        assert_eq!(config.host_scanner, Some(true));
        assert_eq!(config.format, "json");
        assert!(config.policy_identifiers.is_empty());
        assert!(!config.has_exceptions());
    }

    #[test]
    fn test_set_policy_identifiers_skips_duplicates() {
        let mut config = ScanConfiguration::default();
        config.set_policy_identifiers(["nsa", "mitre", "nsa"], &TargetKind::Framework);

        assert_eq!(config.policy_names(), vec!["nsa", "mitre"]);
        assert!(config
            .policy_identifiers
            .iter()
            .all(|p| p.kind == TargetKind::Framework));
    }

    #[test]
    fn test_set_policy_identifiers_empty() {
        let mut config = ScanConfiguration::default();
        config.set_policy_identifiers(Vec::<String>::new(), &TargetKind::Control);
        assert!(config.policy_identifiers.is_empty());
    }

    #[test]
    fn test_serialization_omits_access_key() {
        let mut config = ScanConfiguration::default();
        config.access_key = "secret".to_string();
        config.set_policy_identifiers(["C-0034"], &TargetKind::Control);

        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("accessKey").is_none());
        assert_eq!(json["policyIdentifiers"][0]["kind"], "control");
        assert_eq!(json["policyIdentifiers"][0]["identifier"], "C-0034");
    }
}
