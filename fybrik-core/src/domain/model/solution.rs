// fybrik-core/src/domain/model/solution.rs
//
// Solver output, per spec §3 ResolvedEdge/Solution.

use crate::domain::taxonomy::{Action, CapabilityKind, Interface};
use serde::{Deserialize, Serialize};

/// One instantiated capability in a [`Solution`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedEdge {
    pub module: String,
    pub capability_index: usize,
    pub capability_kind: CapabilityKind,
    pub cluster: String,
    /// Present when this edge persists data (copy/write).
    pub storage_account: Option<String>,
    pub source_interface: Option<Interface>,
    pub sink_interface: Option<Interface>,
    pub actions: Vec<Action>,
}

/// An ordered, fully-constrained data path, per spec §3.
///
/// Invariant: `edge[i].sink == edge[i+1].source`; the union of
/// `edge.actions` across the path equals the required action set with no
/// action assigned twice. Construction is the solver's job — this type
/// only carries the result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub edges: Vec<ResolvedEdge>,
}

impl Solution {
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Every action assigned across the path, in edge order.
    pub fn all_actions(&self) -> Vec<&Action> {
        self.edges.iter().flat_map(|e| e.actions.iter()).collect()
    }
}
