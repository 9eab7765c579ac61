// fybrik-core/src/ports/mod.rs
//
// Component B/I's adapter contracts: narrow traits for the external
// collaborators the core consumes but never implements itself (spec §1's
// "out of scope as external collaborators" list). Mirrors the teacher's
// `ports::connector::Connector` shape — one trait per collaborator, no
// production implementation here, only the contract plus (in
// `infrastructure::adapters`) an in-memory test double.

pub mod applier;
pub mod catalog;
pub mod cluster_lister;
pub mod credentials;
pub mod policy_manager;
pub mod storage_agent;

pub use applier::{ApplierPort, ApplyStatus, ClusterStatus, GeneratedRef, OwnerRef};
pub use catalog::{AssetConnection, AssetMetadata, AssetSpec, CatalogPort, Column};
pub use cluster_lister::ClusterListerPort;
pub use credentials::{Credentials, CredentialsPort};
pub use policy_manager::{PolicyAction, PolicyManagerPort, PolicyRequest};
pub use storage_agent::{
    ApplicationDetails, ConfigOptions, Connection, DatasetDetails, StorageAgentPort,
    StorageAgentRegistry, StorageOptions,
};
