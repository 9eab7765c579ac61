// fybrik-core/src/domain/model/capability.rs

use crate::domain::error::DomainError;
use crate::domain::taxonomy::{ActionName, CapabilityKind, Interface, Scope};
use serde::{Deserialize, Serialize};

/// One declared ability of a [`Module`]: read/write/copy/transform/delete,
/// with its interface and action support, per spec §3.
///
/// Invariants (checked by [`Capability::validate`], enforced once at
/// [`crate::domain::environment::Environment`] construction rather than on
/// every solver lookup):
/// - `read` capabilities have `api` set.
/// - `copy` capabilities have both source and sink on every supported pair.
/// - `transform` is in-place: source == sink on every supported pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    pub kind: CapabilityKind,
    pub scope: Scope,
    pub supported_interfaces: Vec<InterfacePair>,
    #[serde(default)]
    pub supported_actions: Vec<ActionName>,
    #[serde(default)]
    pub plugins: Vec<ActionName>,
    /// Interface exposed to the workload; required for read/write.
    #[serde(default)]
    pub api: Option<Interface>,
}

/// A `(source?, sink?)` pair a capability advertises support for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfacePair {
    pub source: Option<Interface>,
    pub sink: Option<Interface>,
}

impl Capability {
    pub fn supports_action(&self, action: &ActionName) -> bool {
        self.supported_actions.contains(action) || self.plugins.contains(action)
    }

    pub fn action_needs_plugin(&self, action: &ActionName) -> bool {
        !self.supported_actions.contains(action) && self.plugins.contains(action)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        match self.kind {
            CapabilityKind::Read if self.api.is_none() => Err(DomainError::MalformedModule(
                String::new(),
                "read capability must set `api`".to_string(),
            )),
            CapabilityKind::Copy => {
                for pair in &self.supported_interfaces {
                    if pair.source.is_none() || pair.sink.is_none() {
                        return Err(DomainError::MalformedModule(
                            String::new(),
                            "copy capability requires both source and sink on every pair"
                                .to_string(),
                        ));
                    }
                }
                Ok(())
            }
            CapabilityKind::Transform => {
                for pair in &self.supported_interfaces {
                    match (&pair.source, &pair.sink) {
                        (Some(s), Some(k)) if s == k => {}
                        _ => {
                            return Err(DomainError::MalformedModule(
                                String::new(),
                                "transform capability must be in-place (source == sink)"
                                    .to_string(),
                            ));
                        }
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// A polymorphic, deployable data-plane component, per spec §3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    pub capabilities: Vec<Capability>,
}

impl Module {
    pub fn validate(&self) -> Result<(), DomainError> {
        for cap in &self.capabilities {
            cap.validate()
                .map_err(|e| match e {
                    DomainError::MalformedModule(_, msg) => {
                        DomainError::MalformedModule(self.name.clone(), msg)
                    }
                    other => other,
                })?;
        }
        Ok(())
    }

    pub fn capabilities_of(&self, kind: CapabilityKind) -> impl Iterator<Item = (usize, &Capability)> {
        self.capabilities
            .iter()
            .enumerate()
            .filter(move |(_, c)| c.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::taxonomy::DataFormat;

    fn iface(proto: &str) -> Interface {
        Interface::new(proto, DataFormat::named("csv"))
    }

    #[test]
    fn read_capability_without_api_is_invalid() {
        let cap = Capability {
            kind: CapabilityKind::Read,
            scope: Scope::Workload,
            supported_interfaces: vec![],
            supported_actions: vec![],
            plugins: vec![],
            api: None,
        };
        assert!(cap.validate().is_err());
    }

    #[test]
    fn copy_capability_requires_source_and_sink() {
        let cap = Capability {
            kind: CapabilityKind::Copy,
            scope: Scope::Asset,
            supported_interfaces: vec![InterfacePair {
                source: Some(iface("s3")),
                sink: None,
            }],
            supported_actions: vec![],
            plugins: vec![],
            api: None,
        };
        assert!(cap.validate().is_err());
    }

    #[test]
    fn transform_capability_must_be_in_place() {
        let cap = Capability {
            kind: CapabilityKind::Transform,
            scope: Scope::Cluster,
            supported_interfaces: vec![InterfacePair {
                source: Some(iface("s3")),
                sink: Some(iface("jdbc-db2")),
            }],
            supported_actions: vec!["redact".into()],
            plugins: vec![],
            api: None,
        };
        assert!(cap.validate().is_err());

        let valid = Capability {
            supported_interfaces: vec![InterfacePair {
                source: Some(iface("s3")),
                sink: Some(iface("s3")),
            }],
            ..cap
        };
        assert!(valid.validate().is_ok());
    }

    #[test]
    fn supports_action_checks_both_direct_and_plugin() {
        let cap = Capability {
            kind: CapabilityKind::Read,
            scope: Scope::Workload,
            supported_interfaces: vec![],
            supported_actions: vec!["redact".into()],
            plugins: vec!["mask".into()],
            api: Some(iface("arrow-flight")),
        };
        assert!(cap.supports_action(&"redact".into()));
        assert!(cap.supports_action(&"mask".into()));
        assert!(cap.action_needs_plugin(&"mask".into()));
        assert!(!cap.action_needs_plugin(&"redact".into()));
        assert!(!cap.supports_action(&"delete".into()));
    }
}
