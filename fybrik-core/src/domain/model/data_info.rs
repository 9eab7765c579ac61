// fybrik-core/src/domain/model/data_info.rs
//
// The solver's per-asset input, per spec §3 DataInfo.

use crate::domain::taxonomy::{Action, CapabilityKind, FlowType, Interface};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::decision::Decision;

/// The requested interface/flow/dataset context for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataContext {
    pub dataset_id: String,
    pub flow: FlowType,
    pub requested_interface: Interface,
    pub is_new_data_set: bool,
    /// The workload's own cluster (`spec.selector.clusterName`), used to
    /// pin `workload`-scoped capabilities to where the application runs.
    pub workload_cluster: String,
}

/// The asset's current physical connection/format/geography, absent for
/// new-asset writes per spec §3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetDetails {
    pub current_interface: Interface,
    pub geography: String,
}

/// One asset's complete solver input, per spec §3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataInfo {
    pub context: DataContext,
    pub asset_details: Option<AssetDetails>,
    pub required_actions: Vec<Action>,
    #[serde(default)]
    pub storage_actions_by_location: HashMap<String, Vec<Action>>,
    pub configuration: HashMap<CapabilityKind, Decision>,
}

impl DataInfo {
    pub fn decision_for(&self, kind: CapabilityKind) -> Decision {
        self.configuration.get(&kind).cloned().unwrap_or_else(Decision::unconstrained)
    }
}
