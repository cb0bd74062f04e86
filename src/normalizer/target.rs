//! Target selection: which frameworks or controls a request scans.

use crate::configuration::ScanConfiguration;
use crate::core::TargetKind;

/// The literal target name meaning "every framework".
pub const SCAN_ALL_NAME: &str = "all";

/// The outcome of interpreting a request's target type and names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSelection {
    /// Whether the targets are frameworks.
    pub framework_scan: bool,

    /// Whether every available framework is scanned.
    pub scan_all: bool,

    /// Kind to register `names` under; `None` registers nothing.
    pub kind: Option<TargetKind>,

    /// Names to register as policy identifiers.
    pub names: Vec<String>,
}

impl TargetSelection {
    /// Selection used when the request names no explicit targets.
    pub fn all_frameworks() -> Self {
        Self {
            framework_scan: true,
            scan_all: true,
            kind: None,
            names: Vec::new(),
        }
    }

    /// Interprets a raw target type and name list.
    ///
    /// The kind is recognized case-insensitively, while the `"all"` and
    /// `""` markers in the name list are matched exactly. A control scan
    /// never scans all; an unrecognized kind falls back to all frameworks
    /// and drops the supplied names.
    pub fn resolve(target_type: &str, target_names: &[String]) -> Self {
        if target_type.is_empty() || target_names.is_empty() {
            return Self::all_frameworks();
        }

        match TargetKind::parse(target_type) {
            TargetKind::Framework => {
                let scan_all = target_names
                    .iter()
                    .any(|name| name == SCAN_ALL_NAME || name.is_empty());
                let names = target_names
                    .iter()
                    .filter(|name| !name.is_empty() && name.as_str() != SCAN_ALL_NAME)
                    .cloned()
                    .collect();

                Self {
                    framework_scan: true,
                    scan_all,
                    kind: Some(TargetKind::Framework),
                    names,
                }
            }
            TargetKind::Control => Self {
                framework_scan: false,
                scan_all: false,
                kind: Some(TargetKind::Control),
                names: target_names.to_vec(),
            },
            other => {
                tracing::debug!(target_type = %other, "Unknown policy kind, scanning all frameworks");
                Self {
                    framework_scan: true,
                    scan_all: true,
                    kind: Some(other),
                    names: Vec::new(),
                }
            }
        }
    }

    /// Writes this selection into a configuration.
    pub fn apply(self, config: &mut ScanConfiguration) {
        config.framework_scan = self.framework_scan;
        config.scan_all = self.scan_all;

        if let Some(kind) = self.kind {
            config.set_policy_identifiers(self.names, &kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_missing_type_or_names_scans_all() {
        assert_eq!(TargetSelection::resolve("", &[]), TargetSelection::all_frameworks());
        assert_eq!(
            TargetSelection::resolve("", &names(&["nsa"])),
            TargetSelection::all_frameworks()
        );
        assert_eq!(
            TargetSelection::resolve("control", &[]),
            TargetSelection::all_frameworks()
        );
    }

    #[test]
    fn test_framework_all_marker() {
        let selection = TargetSelection::resolve("Framework", &names(&["all"]));
        assert!(selection.framework_scan);
        assert!(selection.scan_all);
        assert_eq!(selection.kind, Some(TargetKind::Framework));
        assert!(selection.names.is_empty());
    }

    #[test]
    fn test_framework_filters_markers() {
        let selection = TargetSelection::resolve("framework", &names(&["nsa", "", "all", "mitre"]));
        assert!(selection.scan_all);
        assert_eq!(selection.names, names(&["nsa", "mitre"]));
    }

    #[test]
    fn test_framework_empty_name_means_all() {
        let selection = TargetSelection::resolve("framework", &names(&["nsa", ""]));
        assert!(selection.scan_all);
        assert_eq!(selection.names, names(&["nsa"]));
    }

    #[test]
    fn test_framework_marker_filtering_is_case_sensitive() {
        let selection = TargetSelection::resolve("FRAMEWORK", &names(&["ALL", "nsa"]));
        assert!(!selection.scan_all);
        assert_eq!(selection.names, names(&["ALL", "nsa"]));
    }

    #[test]
    fn test_control_never_scans_all() {
        let selection = TargetSelection::resolve("Control", &names(&["C-001", "all"]));
        assert!(!selection.framework_scan);
        assert!(!selection.scan_all);
        assert_eq!(selection.kind, Some(TargetKind::Control));
        assert_eq!(selection.names, names(&["C-001", "all"]));
    }

    #[test]
    fn test_unknown_kind_falls_back_to_all_frameworks() {
        let selection = TargetSelection::resolve("bogus", &names(&["x"]));
        assert!(selection.framework_scan);
        assert!(selection.scan_all);
        assert!(selection.names.is_empty());
    }

    #[test]
    fn test_apply_registers_identifiers() {
        let mut config = ScanConfiguration::default();
        TargetSelection::resolve("control", &names(&["C-001"])).apply(&mut config);

        assert!(config.is_control_scan());
        assert_eq!(config.policy_names(), vec!["C-001"]);
        assert_eq!(config.policy_identifiers[0].kind, TargetKind::Control);
    }

    #[test]
    fn test_apply_unknown_kind_registers_nothing() {
        let mut config = ScanConfiguration::default();
        TargetSelection::resolve("bogus", &names(&["x"])).apply(&mut config);

        assert!(config.framework_scan);
        assert!(config.scan_all);
        assert!(config.policy_identifiers.is_empty());
    }
}
