// fybrik-core/src/domain/model/mod.rs
//
// The data model of spec §3: modules/capabilities, infra entities, policy
// decisions, and the solver's input/output types.

mod capability;
mod data_info;
mod decision;
mod infra;
mod solution;

pub use capability::{Capability, InterfacePair, Module};
pub use data_info::{AssetDetails, DataContext, DataInfo};
pub use decision::{AttributeValue, Decision, DeployStatus, Predicate, PredicateValue, Restrictions};
pub use infra::{Cluster, InfrastructureElement, InfrastructureObject, InfrastructureValue, StorageAccount};
pub use solution::{ResolvedEdge, Solution};
