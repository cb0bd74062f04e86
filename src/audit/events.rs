//! Audit event types and emission functions.

use crate::configuration::ScanConfiguration;
use crate::core::ExceptionsError;
use crate::exceptions::ExceptionsLocation;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Base trait for audit events.
pub trait AuditEvent: Serialize {
    /// Returns the event type name.
    fn event_type(&self) -> &'static str;

    /// Returns the timestamp of the event.
    fn timestamp(&self) -> DateTime<Utc>;
}

/// Audit event for a normalized scan request.
///
/// Never carries the access key, only whether one was configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationAuditEvent {
    /// Timestamp of the event.
    pub timestamp: DateTime<Utc>,

    /// Account the scan is attributed to.
    pub account_id: Option<String>,

    /// Whether an access key is configured.
    pub has_access_key: bool,

    /// Whether the targets are frameworks.
    pub framework_scan: bool,

    /// Whether all frameworks are scanned.
    pub scan_all: bool,

    /// Kind of the registered policy identifiers, if any.
    pub target_kind: Option<String>,

    /// Registered policy identifiers.
    pub targets: Vec<String>,

    /// Output format.
    pub format: String,

    /// Keep-local flag.
    pub local: bool,

    /// Submit flag.
    pub submit: bool,

    /// Whether a single object is scanned.
    pub single_object: bool,

    /// Location of persisted exceptions.
    pub exceptions_path: Option<String>,
}

impl NormalizationAuditEvent {
    /// Builds the event from a finished configuration.
    pub fn from_configuration(config: &ScanConfiguration) -> Self {
        Self {
            timestamp: Utc::now(),
            account_id: Some(config.account_id.clone()).filter(|a| !a.is_empty()),
            has_access_key: !config.access_key.is_empty(),
            framework_scan: config.framework_scan,
            scan_all: config.scan_all,
            target_kind: config
                .policy_identifiers
                .first()
                .map(|p| p.kind.to_string()),
            targets: config
                .policy_identifiers
                .iter()
                .map(|p| p.identifier.clone())
                .collect(),
            format: config.format.clone(),
            local: config.local,
            submit: config.submit,
            single_object: config.scan_object.is_some(),
            exceptions_path: config.exceptions_path.as_ref().map(ToString::to_string),
        }
    }
}

impl AuditEvent for NormalizationAuditEvent {
    fn event_type(&self) -> &'static str {
        "scan_request_normalized"
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Emits an audit event for a normalized scan request.
pub fn emit_normalization_event(event: &NormalizationAuditEvent) {
    tracing::info!(
        target: "scanintake::audit",
        event_type = event.event_type(),
        account_id = ?event.account_id,
        has_access_key = event.has_access_key,
        framework_scan = event.framework_scan,
        scan_all = event.scan_all,
        target_kind = ?event.target_kind,
        targets = ?event.targets,
        format = %event.format,
        local = event.local,
        submit = event.submit,
        single_object = event.single_object,
        exceptions_path = ?event.exceptions_path,
        "Scan request normalized"
    );
}

/// Emits an audit event for persisted exceptions.
pub fn emit_exceptions_saved(location: &ExceptionsLocation, count: usize, store: &str) {
    tracing::info!(
        target: "scanintake::audit",
        event_type = "exceptions_saved",
        path = %location,
        count = count,
        store = %store,
        "Exceptions saved"
    );
}

/// Emits an audit event for exceptions that could not be persisted.
pub fn emit_exceptions_dropped(error: &ExceptionsError, count: usize, store: &str) {
    tracing::warn!(
        target: "scanintake::audit",
        event_type = "exceptions_dropped",
        error = %error,
        count = count,
        store = %store,
        "failed to save exceptions, scanning without them"
    );
}
