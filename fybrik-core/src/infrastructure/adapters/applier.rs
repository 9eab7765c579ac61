// fybrik-core/src/infrastructure/adapters/applier.rs
//
// Records every `create_or_update`/`delete` call and reports the recorded
// plan as immediately ready, standing in for the helm-based multi-cluster
// applier (§4.8's "Applier").

use crate::domain::blueprint::BlueprintSpec;
use crate::error::FybrikError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::applier::{ApplierPort, ApplyStatus, GeneratedRef, OwnerRef};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct RecordingApplier {
    applied: Mutex<BTreeMap<String, BTreeMap<String, BlueprintSpec>>>,
}

fn key(reference: &GeneratedRef) -> String {
    format!("{}/{}", reference.namespace, reference.name)
}

#[async_trait]
impl ApplierPort for RecordingApplier {
    async fn create_or_update(
        &self,
        owner: &OwnerRef,
        name: &str,
        blueprints: &BTreeMap<String, BlueprintSpec>,
    ) -> Result<GeneratedRef, FybrikError> {
        let reference = GeneratedRef {
            namespace: owner.namespace.clone(),
            name: name.to_string(),
        };
        self.applied
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(key(&reference), blueprints.clone());
        Ok(reference)
    }

    async fn get(&self, reference: &GeneratedRef) -> Result<ApplyStatus, FybrikError> {
        let applied = self.applied.lock().unwrap_or_else(|p| p.into_inner());
        let Some(plan) = applied.get(&key(reference)) else {
            return Err(InfrastructureError::Applier(format!("no such plan '{}'", key(reference))).into());
        };
        Ok(ApplyStatus {
            ready: true,
            error: None,
            per_cluster: plan
                .keys()
                .map(|cluster| crate::ports::applier::ClusterStatus {
                    cluster: cluster.clone(),
                    ready: true,
                    error: None,
                })
                .collect(),
        })
    }

    async fn delete(&self, reference: &GeneratedRef) -> Result<(), FybrikError> {
        self.applied.lock().unwrap_or_else(|p| p.into_inner()).remove(&key(reference));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_get_reports_ready() {
        let applier = RecordingApplier::default();
        let owner = OwnerRef {
            namespace: "default".into(),
            name: "app1".into(),
        };
        let reference = applier.create_or_update(&owner, "app1-plan", &BTreeMap::new()).await.unwrap();
        let status = applier.get(&reference).await.unwrap();
        assert!(status.ready);
    }

    #[tokio::test]
    async fn get_after_delete_fails() {
        let applier = RecordingApplier::default();
        let owner = OwnerRef {
            namespace: "default".into(),
            name: "app1".into(),
        };
        let reference = applier.create_or_update(&owner, "app1-plan", &BTreeMap::new()).await.unwrap();
        applier.delete(&reference).await.unwrap();
        assert!(applier.get(&reference).await.is_err());
    }
}
