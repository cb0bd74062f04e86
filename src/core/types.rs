//! Core types shared by requests and configurations.
//!
//! This module defines the target kinds a scan can select, the opaque
//! descriptors carried through from the request unchanged, and the
//! exception-policy records persisted for the scan engine.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};

/// The kind of policy a scan targets.
///
/// Recognition is case-insensitive (`"Framework"`, `"CONTROL"`), and the
/// recognized kinds always render in their canonical lowercase form.
/// Anything else is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TargetKind {
    /// A named collection of controls evaluated as a unit.
    Framework,
    /// Individual controls addressed directly.
    Control,
    /// An unrecognized kind, preserved as supplied.
    Other(String),
}

impl TargetKind {
    /// Canonical name of the framework kind.
    pub const FRAMEWORK: &'static str = "framework";
    /// Canonical name of the control kind.
    pub const CONTROL: &'static str = "control";

    /// Parses a kind, matching the known kinds case-insensitively.
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case(Self::FRAMEWORK) {
            Self::Framework
        } else if raw.eq_ignore_ascii_case(Self::CONTROL) {
            Self::Control
        } else {
            Self::Other(raw.to_string())
        }
    }

    /// Returns the kind as a string slice.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Framework => Self::FRAMEWORK,
            Self::Control => Self::CONTROL,
            Self::Other(raw) => raw,
        }
    }

}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for TargetKind {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<&str> for TargetKind {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<TargetKind> for String {
    fn from(kind: TargetKind) -> Self {
        match kind {
            TargetKind::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Where the scan engine loads its policy artifacts from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "path", rename_all = "snake_case")]
pub enum ArtifactSource {
    /// Reuse artifacts previously downloaded into the engine's local cache.
    LocalCache,
    /// Load artifacts from an explicit directory.
    Directory(PathBuf),
}

impl ArtifactSource {
    /// Returns the explicit directory, if any.
    pub fn directory(&self) -> Option<&Path> {
        match self {
            Self::LocalCache => None,
            Self::Directory(path) => Some(path),
        }
    }

    /// Returns `true` for the local-cache sentinel.
    pub fn is_local_cache(&self) -> bool {
        matches!(self, Self::LocalCache)
    }
}

/// Descriptor of a single Kubernetes object to scan.
///
/// The normalizer never interprets it; validation is left to the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanObject {
    /// API version of the object (e.g. `apps/v1`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub api_version: String,

    /// Object kind (e.g. `Deployment`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub kind: String,

    /// Object metadata, passed through verbatim.
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: Map<String, Value>,

    /// Any other fields, preserved as supplied.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScanObject {
    /// Creates a descriptor for the given API version and kind.
    pub fn new(api_version: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Sets the object name in its metadata.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.metadata
            .insert("name".to_string(), Value::String(name.into()));
        self
    }

    /// Returns the object name, if set.
    pub fn name(&self) -> Option<&str> {
        self.metadata.get("name").and_then(Value::as_str)
    }
}

/// Selects which posture rules an exception applies to.
///
/// A read view over an exception's `posturePolicies` entries; `null` and
/// missing fields both read as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosturePolicy {
    /// Framework the exception is scoped to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework_name: Option<String>,

    /// Control identifier (e.g. `C-0034`).
    #[serde(default, rename = "controlID", skip_serializing_if = "Option::is_none")]
    pub control_id: Option<String>,

    /// Human-readable control name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_name: Option<String>,

    /// Rule name within the control.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_name: Option<String>,
}

impl PosturePolicy {
    /// Creates a selector for a single control.
    pub fn control(control_id: impl Into<String>) -> Self {
        Self {
            control_id: Some(control_id.into()),
            ..Self::default()
        }
    }

    /// Creates a selector for a whole framework.
    pub fn framework(framework_name: impl Into<String>) -> Self {
        Self {
            framework_name: Some(framework_name.into()),
            ..Self::default()
        }
    }
}

impl From<PosturePolicy> for Value {
    fn from(policy: PosturePolicy) -> Self {
        let mut fields = Map::new();
        let entries = [
            ("frameworkName", policy.framework_name),
            ("controlID", policy.control_id),
            ("controlName", policy.control_name),
            ("ruleName", policy.rule_name),
        ];
        for (key, value) in entries {
            if let Some(value) = value {
                fields.insert(key.to_string(), Value::String(value));
            }
        }
        Value::Object(fields)
    }
}

/// A caller-supplied rule suppressing or altering findings.
///
/// Exception records are opaque to the normalizer. The JSON document is
/// held as supplied and written back byte-for-byte, including explicit
/// `null`, `[]` and `""` values; the accessors below are lenient read
/// views over it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExceptionPolicy(Value);

impl ExceptionPolicy {
    /// Creates a named exception policy.
    pub fn new(name: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("name".to_string(), Value::String(name.into()));
        Self(Value::Object(fields))
    }

    /// Returns the underlying JSON document.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Returns a top-level field as supplied.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Name of the exception policy; empty when missing or not a string.
    pub fn name(&self) -> &str {
        self.attribute("name").and_then(Value::as_str).unwrap_or_default()
    }

    /// Policy type (e.g. `postureExceptionPolicy`).
    pub fn policy_type(&self) -> Option<&str> {
        self.attribute("policyType").and_then(Value::as_str)
    }

    /// Actions applied to matching findings (e.g. `alertOnly`).
    pub fn actions(&self) -> Vec<&str> {
        self.array("actions").filter_map(Value::as_str).collect()
    }

    /// Resource designators the exception covers.
    pub fn resources(&self) -> Vec<&Value> {
        self.array("resources").collect()
    }

    /// Rules the exception covers. Entries that are not objects are skipped.
    pub fn posture_policies(&self) -> Vec<PosturePolicy> {
        self.array("posturePolicies")
            .filter_map(|entry| PosturePolicy::deserialize(entry).ok())
            .collect()
    }

    /// Sets the policy type.
    pub fn with_policy_type(self, policy_type: impl Into<String>) -> Self {
        self.with_attribute("policyType", Value::String(policy_type.into()))
    }

    /// Adds an action.
    pub fn with_action(self, action: impl Into<String>) -> Self {
        self.with_item("actions", Value::String(action.into()))
    }

    /// Adds a resource designator.
    pub fn with_resource(self, resource: Value) -> Self {
        self.with_item("resources", resource)
    }

    /// Adds a posture policy selector.
    pub fn with_posture_policy(self, policy: PosturePolicy) -> Self {
        self.with_item("posturePolicies", policy.into())
    }

    /// Sets a top-level field.
    pub fn with_attribute(self, key: impl Into<String>, value: Value) -> Self {
        self.map_fields(|fields| {
            fields.insert(key.into(), value);
        })
    }

    fn array(&self, key: &str) -> impl Iterator<Item = &Value> {
        self.attribute(key)
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
    }

    fn with_item(self, key: &str, item: Value) -> Self {
        self.map_fields(|fields| {
            match fields.entry(key.to_string()).or_insert_with(|| Value::Array(Vec::new())) {
                Value::Array(items) => items.push(item),
                other => *other = Value::Array(vec![item]),
            }
        })
    }

    // Builders only ever produce objects; a non-object document is replaced.
    fn map_fields(self, update: impl FnOnce(&mut Map<String, Value>)) -> Self {
        let mut fields = match self.0 {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };
        update(&mut fields);
        Self(Value::Object(fields))
    }
}

impl From<Value> for ExceptionPolicy {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Deserializes `null` as the type's default value.
///
/// Pairs with `#[serde(default)]`, which covers missing keys.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
