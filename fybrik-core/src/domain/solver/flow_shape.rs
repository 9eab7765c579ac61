// fybrik-core/src/domain/solver/flow_shape.rs
//
// Maps a flow type to the boundary shape the search must satisfy, per the
// flow table in spec §4.5:
//
// | Flow           | first edge source        | last edge sink      | terminal capability |
// |----------------|---------------------------|----------------------|----------------------|
// | read           | asset's current interface | requested interface  | read (last edge)     |
// | write existing | requested interface       | asset's current iface| write (first edge)   |
// | write new      | requested interface       | some storage account | write (first edge)   |
// | copy           | asset's current interface | some storage account | copy (first edge)    |
// | delete         | asset's current interface | —                    | delete (only edge)   |

use crate::domain::error::SolverDiagnostic;
use crate::domain::model::DataInfo;
use crate::domain::taxonomy::{CapabilityKind, FlowType, Interface};

/// Which boundary of the path the flow's defining capability is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinnedPosition {
    First,
    Last,
}

/// What a complete chain must terminate at.
#[derive(Debug, Clone, PartialEq)]
pub enum EndTarget {
    /// The last edge's sink must match this interface exactly.
    Interface(Interface),
    /// The last edge must persist into a storage account satisfying
    /// restrictions and governance's per-location storage actions.
    AnyStorageAccount,
    /// No continuation: the single required edge is the whole path.
    Immediate,
}

#[derive(Debug, Clone)]
pub struct FlowShape {
    pub start_interface: Interface,
    pub end: EndTarget,
    pub pinned_kind: CapabilityKind,
    pub pinned_position: PinnedPosition,
    pub flow_name: String,
}

impl FlowShape {
    pub fn for_flow(data_info: &DataInfo) -> Result<Self, SolverDiagnostic> {
        let flow = data_info.context.flow;
        let flow_name = flow.to_string();
        let asset_interface = || {
            data_info
                .asset_details
                .as_ref()
                .map(|a| a.current_interface.clone())
                .ok_or_else(|| SolverDiagnostic::NoEndpointModule {
                    flow: flow_name.clone(),
                })
        };

        match flow {
            FlowType::Read => Ok(Self {
                start_interface: asset_interface()?,
                end: EndTarget::Interface(data_info.context.requested_interface.clone()),
                pinned_kind: CapabilityKind::Read,
                pinned_position: PinnedPosition::Last,
                flow_name,
            }),
            FlowType::Write if !data_info.context.is_new_data_set => Ok(Self {
                start_interface: data_info.context.requested_interface.clone(),
                end: EndTarget::Interface(asset_interface()?),
                pinned_kind: CapabilityKind::Write,
                pinned_position: PinnedPosition::First,
                flow_name,
            }),
            FlowType::Write => Ok(Self {
                start_interface: data_info.context.requested_interface.clone(),
                end: EndTarget::AnyStorageAccount,
                pinned_kind: CapabilityKind::Write,
                pinned_position: PinnedPosition::First,
                flow_name,
            }),
            FlowType::Copy => Ok(Self {
                start_interface: asset_interface()?,
                end: EndTarget::AnyStorageAccount,
                pinned_kind: CapabilityKind::Copy,
                pinned_position: PinnedPosition::First,
                flow_name,
            }),
            FlowType::Delete => Ok(Self {
                start_interface: asset_interface()?,
                end: EndTarget::Immediate,
                pinned_kind: CapabilityKind::Delete,
                pinned_position: PinnedPosition::First,
                flow_name,
            }),
        }
    }
}
