//! The scan request value object.

use crate::core::types::null_as_default;
use crate::core::{redact, ExceptionPolicy, RequestError, ScanObject};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A request to run a posture scan.
///
/// The request is read-only input to the normalizer. Tri-state flags are
/// `Option<bool>` so that "not supplied" stays distinct from an explicit
/// `false`. A JSON `null` is treated like a missing field everywhere.
///
/// # Examples
///
/// ```rust
/// use scanintake::ScanRequest;
///
/// let body = br#"{"targetType": "framework", "targetNames": ["nsa"], "keepLocal": true}"#;
/// let request = ScanRequest::from_json(body).unwrap();
/// assert_eq!(request.target_names, vec!["nsa".to_string()]);
/// assert_eq!(request.keep_local, Some(true));
/// ```
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanRequest {
    /// Account identifier results are attributed to.
    #[serde(deserialize_with = "null_as_default")]
    pub account: String,

    /// Access key for the account backend.
    #[serde(deserialize_with = "null_as_default")]
    pub access_key: String,

    /// Namespaces to leave out of the scan.
    #[serde(deserialize_with = "null_as_default")]
    pub excluded_namespaces: Vec<String>,

    /// Namespaces to restrict the scan to.
    #[serde(deserialize_with = "null_as_default")]
    pub include_namespaces: Vec<String>,

    /// Output format (e.g. `json`, `junit`).
    #[serde(deserialize_with = "null_as_default")]
    pub format: String,

    /// Reuse previously downloaded artifacts instead of fetching them.
    pub use_cached_artifacts: Option<bool>,

    /// Keep results local instead of reporting them.
    pub keep_local: Option<bool>,

    /// Submit results to the backend.
    pub submit: Option<bool>,

    /// Deploy the host scanner.
    pub host_scanner: Option<bool>,

    /// Single object to scan instead of the whole cluster.
    pub scan_object: Option<ScanObject>,

    /// Whether `scan_object` describes a deleted object.
    pub is_deleted_scan_object: Option<bool>,

    /// Raw target type (`framework`, `control`, anything else).
    #[serde(deserialize_with = "null_as_default")]
    pub target_type: String,

    /// Names of the frameworks or controls to scan.
    #[serde(deserialize_with = "null_as_default")]
    pub target_names: Vec<String>,

    /// Exception policies to apply to this scan.
    pub exceptions: Option<Vec<ExceptionPolicy>>,
}

impl ScanRequest {
    /// Creates an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a request from a JSON body.
    pub fn from_json(body: &[u8]) -> Result<Self, RequestError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Sets the target type and names.
    pub fn with_target<I, S>(mut self, target_type: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_type = target_type.into();
        self.target_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the account.
    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = account.into();
        self
    }

    /// Sets the access key.
    pub fn with_access_key(mut self, access_key: impl Into<String>) -> Self {
        self.access_key = access_key.into();
        self
    }

    /// Adds an excluded namespace.
    pub fn with_excluded_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.excluded_namespaces.push(namespace.into());
        self
    }

    /// Adds an included namespace.
    pub fn with_include_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.include_namespaces.push(namespace.into());
        self
    }

    /// Sets the output format.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Sets the use-cached-artifacts flag.
    pub fn with_use_cached_artifacts(mut self, enabled: bool) -> Self {
        self.use_cached_artifacts = Some(enabled);
        self
    }

    /// Sets the keep-local flag.
    pub fn with_keep_local(mut self, keep_local: bool) -> Self {
        self.keep_local = Some(keep_local);
        self
    }

    /// Sets the submit flag.
    pub fn with_submit(mut self, submit: bool) -> Self {
        self.submit = Some(submit);
        self
    }

    /// Sets the host-scanner flag.
    pub fn with_host_scanner(mut self, enabled: bool) -> Self {
        self.host_scanner = Some(enabled);
        self
    }

    /// Sets the single object to scan.
    pub fn with_scan_object(mut self, object: ScanObject, is_deleted: bool) -> Self {
        self.scan_object = Some(object);
        self.is_deleted_scan_object = Some(is_deleted);
        self
    }

    /// Sets the exception policies.
    pub fn with_exceptions(mut self, exceptions: Vec<ExceptionPolicy>) -> Self {
        self.exceptions = Some(exceptions);
        self
    }
}

impl fmt::Debug for ScanRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanRequest")
            .field("account", &self.account)
            .field("access_key", &redact(&self.access_key))
            .field("excluded_namespaces", &self.excluded_namespaces)
            .field("include_namespaces", &self.include_namespaces)
            .field("format", &self.format)
            .field("use_cached_artifacts", &self.use_cached_artifacts)
            .field("keep_local", &self.keep_local)
            .field("submit", &self.submit)
            .field("host_scanner", &self.host_scanner)
            .field("scan_object", &self.scan_object)
            .field("is_deleted_scan_object", &self.is_deleted_scan_object)
            .field("target_type", &self.target_type)
            .field("target_names", &self.target_names)
            .field("exceptions", &self.exceptions.as_ref().map(Vec::len))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_full_body() {
        let body = br#"{
            "account": "acc-1",
            "accessKey": "secret",
            "excludedNamespaces": ["kube-system", "kube-public"],
            "includeNamespaces": [],
            "format": "junit",
            "useCachedArtifacts": true,
            "keepLocal": false,
            "submit": true,
            "hostScanner": false,
            "scanObject": {"apiVersion": "v1", "kind": "Pod", "metadata": {"name": "p"}},
            "isDeletedScanObject": true,
            "targetType": "Framework",
            "targetNames": ["nsa", "mitre"],
            "exceptions": [{"name": "e1"}]
        }"#;

        let request = ScanRequest::from_json(body).unwrap();
        assert_eq!(request.account, "acc-1");
        assert_eq!(request.excluded_namespaces.len(), 2);
        assert_eq!(request.use_cached_artifacts, Some(true));
        assert_eq!(request.keep_local, Some(false));
        assert_eq!(request.host_scanner, Some(false));
        assert_eq!(request.is_deleted_scan_object, Some(true));
        assert_eq!(request.scan_object.as_ref().unwrap().kind, "Pod");
        assert_eq!(request.exceptions.as_ref().unwrap()[0].name(), "e1");
        assert_eq!(request.target_type, "Framework");
    }

    #[test]
    fn test_from_json_empty_body() {
        let request = ScanRequest::from_json(b"{}").unwrap();
        assert_eq!(request, ScanRequest::default());
        assert!(request.exceptions.is_none());
    }

    #[test]
    fn test_from_json_null_flag_is_absent() {
        let request = ScanRequest::from_json(br#"{"keepLocal": null, "exceptions": []}"#).unwrap();
        assert_eq!(request.keep_local, None);
        assert_eq!(request.exceptions, Some(vec![]));
    }

    #[test]
    fn test_from_json_null_fields_are_absent() {
        let body = br#"{
            "account": null,
            "accessKey": null,
            "excludedNamespaces": null,
            "includeNamespaces": null,
            "format": null,
            "useCachedArtifacts": null,
            "keepLocal": null,
            "submit": null,
            "hostScanner": null,
            "scanObject": null,
            "isDeletedScanObject": null,
            "targetType": null,
            "targetNames": null,
            "exceptions": null
        }"#;

        let request = ScanRequest::from_json(body).unwrap();
        assert_eq!(request, ScanRequest::default());
    }

    #[test]
    fn test_from_json_null_inside_records() {
        let body = br#"{
            "scanObject": {"apiVersion": null, "kind": "Pod", "metadata": null},
            "exceptions": [{"name": "e1", "actions": null, "resources": null, "posturePolicies": null}]
        }"#;

        let request = ScanRequest::from_json(body).unwrap();
        assert_eq!(request.scan_object, Some(ScanObject::new("", "Pod")));
        let exceptions = request.exceptions.unwrap();
        assert_eq!(exceptions[0].name(), "e1");
        assert!(exceptions[0].actions().is_empty());
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        assert!(ScanRequest::from_json(b"{\"targetNames\": 3}").is_err());
        assert!(ScanRequest::from_json(b"not json").is_err());
    }

    #[test]
    fn test_debug_redacts_access_key() {
        let request = ScanRequest::new().with_access_key("super-secret");
        let rendered = format!("{:?}", request);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
