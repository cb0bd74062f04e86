//! The request normalizer implementation.

use crate::audit::{
    emit_exceptions_dropped, emit_exceptions_saved, emit_normalization_event,
    NormalizationAuditEvent,
};
use crate::config::NormalizerConfig;
use crate::configuration::ScanConfiguration;
use crate::core::{ArtifactSource, ExceptionPolicy};
use crate::exceptions::{ExceptionsLocation, ExceptionsStore};
use crate::normalizer::target::TargetSelection;
use crate::request::ScanRequest;

use std::sync::Arc;

/// Builder for creating a `RequestNormalizer`.
pub struct RequestNormalizerBuilder {
    config: NormalizerConfig,
    store: Option<Arc<dyn ExceptionsStore>>,
}

impl RequestNormalizerBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            config: NormalizerConfig::default(),
            store: None,
        }
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: NormalizerConfig) -> Self {
        self.config = config;
        self
    }

    /// Overrides the exceptions store described by the configuration.
    pub fn with_store<S: ExceptionsStore + 'static>(mut self, store: S) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Overrides the exceptions store with a shared one.
    pub fn with_arc_store(mut self, store: Arc<dyn ExceptionsStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Builds the normalizer.
    pub fn build(self) -> RequestNormalizer {
        let store = self
            .store
            .unwrap_or_else(|| self.config.exceptions.build_store());

        RequestNormalizer {
            config: self.config,
            store,
        }
    }
}

impl Default for RequestNormalizerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns scan requests into scan configurations.
///
/// Normalization never fails: every request field is optional, and a
/// failure to persist exceptions only drops the exceptions from the
/// resulting configuration. The normalizer holds no per-request state and
/// can be shared across threads.
///
/// # Examples
///
/// ```rust
/// use scanintake::{RequestNormalizer, ScanRequest};
/// use scanintake::exceptions::InMemoryStore;
///
/// let normalizer = RequestNormalizer::builder()
///     .with_store(InMemoryStore::new())
///     .build();
///
/// let request = ScanRequest::new().with_target("control", ["C-0034"]);
/// let config = normalizer.build_configuration(&request);
///
/// assert!(!config.framework_scan);
/// assert_eq!(config.policy_names(), vec!["C-0034"]);
/// ```
pub struct RequestNormalizer {
    config: NormalizerConfig,
    store: Arc<dyn ExceptionsStore>,
}

impl std::fmt::Debug for RequestNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestNormalizer")
            .field("config", &self.config)
            .field("store", &self.store.name())
            .finish()
    }
}

impl RequestNormalizer {
    /// Creates a builder for configuring the normalizer.
    pub fn builder() -> RequestNormalizerBuilder {
        RequestNormalizerBuilder::new()
    }

    /// Creates a normalizer using the store described by `config`.
    pub fn new(config: NormalizerConfig) -> Self {
        Self::builder().with_config(config).build()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Returns the exceptions store.
    pub fn store(&self) -> &Arc<dyn ExceptionsStore> {
        &self.store
    }

    /// Builds the scan configuration for a request.
    ///
    /// Starts from the configured defaults, resolves the targets, then
    /// copies every field the request actually carries. Empty strings and
    /// lists, and absent flags, leave the defaults untouched.
    pub fn build_configuration(&self, request: &ScanRequest) -> ScanConfiguration {
        let mut config = ScanConfiguration::from_defaults(&self.config.defaults);

        TargetSelection::resolve(&request.target_type, &request.target_names).apply(&mut config);

        if !request.account.is_empty() {
            config.account_id = request.account.clone();
        }
        if !request.access_key.is_empty() {
            config.access_key = request.access_key.clone();
        }
        if !request.excluded_namespaces.is_empty() {
            config.excluded_namespaces = request.excluded_namespaces.join(",");
        }
        if !request.include_namespaces.is_empty() {
            config.include_namespaces = request.include_namespaces.join(",");
        }
        if !request.format.is_empty() {
            config.format = request.format.clone();
        }

        // Reuse downloaded artifacts instead of fetching them on every scan.
        if request.use_cached_artifacts == Some(true) {
            config.artifact_source = Some(ArtifactSource::LocalCache);
        }
        if let Some(keep_local) = request.keep_local {
            config.local = keep_local;
        }
        if let Some(submit) = request.submit {
            config.submit = submit;
        }
        if let Some(host_scanner) = request.host_scanner {
            config.host_scanner = Some(host_scanner);
        }

        if let Some(object) = &request.scan_object {
            config.scan_object = Some(object.clone());
        }
        if let Some(is_deleted) = request.is_deleted_scan_object {
            config.is_deleted_scan_object = is_deleted;
        }

        if let Some(exceptions) = &request.exceptions {
            config.exceptions_path = self.save_exceptions(exceptions);
        }

        if self.config.audit_enabled {
            emit_normalization_event(&NormalizationAuditEvent::from_configuration(&config));
        }

        config
    }

    /// Decodes a JSON body and builds its scan configuration.
    pub fn build_from_json(
        &self,
        body: &[u8],
    ) -> Result<ScanConfiguration, crate::core::RequestError> {
        let request = ScanRequest::from_json(body)?;
        Ok(self.build_configuration(&request))
    }

    /// Persists exceptions, returning `None` if they could not be saved.
    fn save_exceptions(&self, exceptions: &[ExceptionPolicy]) -> Option<ExceptionsLocation> {
        match self.store.persist(exceptions) {
            Ok(location) => {
                emit_exceptions_saved(&location, exceptions.len(), self.store.name());
                Some(location)
            }
            Err(e) => {
                emit_exceptions_dropped(&e, exceptions.len(), self.store.name());
                None
            }
        }
    }
}

impl Default for RequestNormalizer {
    fn default() -> Self {
        Self::new(NormalizerConfig::default())
    }
}
