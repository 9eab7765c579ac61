// fybrik-core/src/application/mod.rs
//
// Use cases (components C, D, H, and the I consumer), depending on domain
// and ports but implementing neither collaborator.

pub mod config_policy;
pub mod governance;
pub mod reconcile;
pub mod request_source;
pub mod storage_provision;

pub use config_policy::{ConfigPolicyEvaluator, ConfigPolicyOutput, ConfigPolicyRequest, DefaultConfigPolicyEvaluator};
pub use governance::{DefaultGovernanceEvaluator, GovernanceEvaluator, GovernanceOutput, GovernanceRequest};
pub use reconcile::{
    AssetRequest, AssetStatus, Clock, Condition, Endpoint, Reconciler, Request, RequestPhase, RequestStatus,
    SystemClock,
};
pub use request_source::{PendingRequest, RequestSourcePort};
pub use storage_provision::{ProvisionContext, ProvisionedStorageEntry, StorageProvisioner};
