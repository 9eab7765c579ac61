// fybrik-core/src/domain/taxonomy/mod.rs
//
// Component A: the value types the rest of the solver treats as opaque
// tags. Protocols and formats are open string newtypes rather than closed
// enums — the real taxonomy is schema-driven and extensible by the admin,
// so a closed enum here would fight the domain rather than model it.

mod action;
mod flow;
mod interface;

pub use action::{Action, ActionName, AppliedOn};
pub use flow::FlowType;
pub use interface::{DataFormat, Interface, Protocol};

use serde::{Deserialize, Serialize};

/// The kind of capability a module advertises, per spec §3 Module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    Read,
    Write,
    Copy,
    Transform,
    Delete,
}

impl std::fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Copy => "copy",
            Self::Transform => "transform",
            Self::Delete => "delete",
        };
        write!(f, "{s}")
    }
}

/// Where a capability instance is deployed relative to the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Workload,
    Asset,
    Cluster,
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Workload => "workload",
            Self::Asset => "asset",
            Self::Cluster => "cluster",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_kind_display_matches_serde_names() {
        for (kind, expected) in [
            (CapabilityKind::Read, "read"),
            (CapabilityKind::Write, "write"),
            (CapabilityKind::Copy, "copy"),
            (CapabilityKind::Transform, "transform"),
            (CapabilityKind::Delete, "delete"),
        ] {
            assert_eq!(kind.to_string(), expected);
        }
    }
}
