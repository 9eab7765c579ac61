// fybrik-core/src/ports/applier.rs
//
// Component H's collaborator: the helm-based multi-cluster blueprint
// applier, per spec §4.8/§6. Genuinely out of scope as an implementation;
// this is the contract the reconciler drives.

use crate::domain::blueprint::BlueprintSpec;
use crate::error::FybrikError;
use std::collections::BTreeMap;

/// The owning request, used to stamp the deployed plan's owner reference.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnerRef {
    pub namespace: String,
    pub name: String,
}

/// A namespaced reference to the applied multi-cluster plan (the
/// "Plotter" per the glossary), returned by `CreateOrUpdate` and polled
/// by `Get`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedRef {
    pub namespace: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClusterStatus {
    pub cluster: String,
    pub ready: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApplyStatus {
    pub ready: bool,
    pub error: Option<String>,
    pub per_cluster: Vec<ClusterStatus>,
}

#[async_trait::async_trait]
pub trait ApplierPort: Send + Sync {
    async fn create_or_update(
        &self,
        owner: &OwnerRef,
        name: &str,
        blueprints: &BTreeMap<String, BlueprintSpec>,
    ) -> Result<GeneratedRef, FybrikError>;

    /// Level-triggered readiness poll, per spec §5 ("Backpressure").
    async fn get(&self, reference: &GeneratedRef) -> Result<ApplyStatus, FybrikError>;

    async fn delete(&self, reference: &GeneratedRef) -> Result<(), FybrikError>;
}
