// fybrik-core/src/domain/blueprint.rs
//
// Component G: projects a [`Solution`] into one [`BlueprintSpec`] per
// cluster, per spec §4.6. Pure and deterministic: the same solution
// always serializes to the same bytes, which is what the reconciler
// diffs against the previously-applied generation to decide whether a
// re-apply is needed.

use crate::domain::model::Solution;
use crate::domain::taxonomy::CapabilityKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The request this blueprint was generated for, used to stamp the
/// owner label so storage/cleanup can find everything a request created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestOwner {
    pub namespace: String,
    pub name: String,
}

impl RequestOwner {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// `owner=namespace.name`, per spec §4.6/§5 ("Shared resources").
    pub fn label(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }
}

/// One deployed instance of a module capability, carrying the chart
/// values the data-plane needs to wire this edge to its neighbors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleInstance {
    pub module: String,
    pub capability_kind: CapabilityKind,
    /// Chart values derived from `{source, sink, actions, storageAccount}`.
    /// A `BTreeMap` so serialization order never depends on insertion order.
    pub chart_values: BTreeMap<String, String>,
    pub owner_label: String,
}

/// The deployment unit for one cluster: an ordered sequence of module
/// instances, order preserved from the solution's edge order so the
/// data-plane can wire pipes between consecutive instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlueprintSpec {
    pub cluster: String,
    pub namespace: String,
    pub instances: Vec<ModuleInstance>,
}

pub struct BlueprintGenerator;

impl BlueprintGenerator {
    /// `Generate(solution, requestOwner) -> map[cluster -> BlueprintSpec]`.
    pub fn generate(
        solution: &Solution,
        owner: &RequestOwner,
        modules_namespace: &str,
    ) -> BTreeMap<String, BlueprintSpec> {
        let mut by_cluster: BTreeMap<String, Vec<ModuleInstance>> = BTreeMap::new();

        for edge in &solution.edges {
            let mut chart_values = BTreeMap::new();
            if let Some(source) = &edge.source_interface {
                chart_values.insert("source.protocol".to_string(), source.protocol.to_string());
                chart_values.insert("source.format".to_string(), source.format.to_string());
            }
            if let Some(sink) = &edge.sink_interface {
                chart_values.insert("sink.protocol".to_string(), sink.protocol.to_string());
                chart_values.insert("sink.format".to_string(), sink.format.to_string());
            }
            if let Some(account) = &edge.storage_account {
                chart_values.insert("storageAccount".to_string(), account.clone());
            }
            if !edge.actions.is_empty() {
                let names: Vec<String> = edge.actions.iter().map(|a| a.name.to_string()).collect();
                chart_values.insert("actions".to_string(), names.join(","));
            }

            by_cluster
                .entry(edge.cluster.clone())
                .or_default()
                .push(ModuleInstance {
                    module: edge.module.clone(),
                    capability_kind: edge.capability_kind,
                    chart_values,
                    owner_label: owner.label(),
                });
        }

        by_cluster
            .into_iter()
            .map(|(cluster, instances)| {
                let spec = BlueprintSpec {
                    cluster: cluster.clone(),
                    namespace: modules_namespace.to_string(),
                    instances,
                };
                (cluster, spec)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ResolvedEdge;
    use crate::domain::taxonomy::{Action, ActionName, AppliedOn, Interface};

    fn edge(module: &str, cluster: &str, actions: Vec<ActionName>) -> ResolvedEdge {
        ResolvedEdge {
            module: module.to_string(),
            capability_index: 0,
            capability_kind: CapabilityKind::Read,
            cluster: cluster.to_string(),
            storage_account: None,
            source_interface: Some(Interface::new("s3", "csv".into())),
            sink_interface: Some(Interface::new("arrow-flight", "csv".into())),
            actions: actions
                .into_iter()
                .map(|name| Action {
                    name,
                    arguments: Default::default(),
                    applied_on: AppliedOn::Dataset,
                    columns: vec![],
                })
                .collect(),
        }
    }

    #[test]
    fn groups_edges_by_cluster_in_edge_order() {
        let solution = Solution {
            edges: vec![
                edge("copy-mod", "eu-1", vec!["redact".into()]),
                edge("read-mod", "workload-1", vec![]),
            ],
        };
        let owner = RequestOwner::new("default", "app1");
        let blueprints = BlueprintGenerator::generate(&solution, &owner, "fybrik-modules");

        assert_eq!(blueprints.len(), 2);
        let eu = &blueprints["eu-1"];
        assert_eq!(eu.instances.len(), 1);
        assert_eq!(eu.instances[0].module, "copy-mod");
        assert_eq!(eu.instances[0].owner_label, "default.app1");
        assert_eq!(eu.instances[0].chart_values.get("actions"), Some(&"redact".to_string()));
    }

    #[test]
    fn generation_is_deterministic() {
        let solution = Solution {
            edges: vec![edge("copy-mod", "eu-1", vec!["redact".into(), "mask".into()])],
        };
        let owner = RequestOwner::new("default", "app1");
        let a = BlueprintGenerator::generate(&solution, &owner, "fybrik-modules");
        let b = BlueprintGenerator::generate(&solution, &owner, "fybrik-modules");
        let bytes_a = serde_json::to_vec(&a).unwrap();
        let bytes_b = serde_json::to_vec(&b).unwrap();
        assert_eq!(bytes_a, bytes_b);
    }
}
