// fybrik-core/src/domain/solver/chain.rs

use crate::domain::taxonomy::{CapabilityKind, Interface};

/// One structurally-placed edge in a candidate path, before action
/// assignment. Mirrors [`crate::domain::model::ResolvedEdge`] minus
/// `actions`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainStep {
    pub module: String,
    pub capability_index: usize,
    pub capability_kind: CapabilityKind,
    pub cluster: String,
    pub account: Option<String>,
    pub source_interface: Option<Interface>,
    pub sink_interface: Option<Interface>,
}
