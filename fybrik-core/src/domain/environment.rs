// fybrik-core/src/domain/environment.rs
//
// Component E: an immutable, per-solve snapshot of clusters, modules,
// storage accounts and infrastructure attributes, per spec §3/§4.4.

use crate::domain::error::DomainError;
use crate::domain::model::{
    AttributeValue, Cluster, InfrastructureElement, InfrastructureObject, Module, StorageAccount,
};
use crate::domain::taxonomy::Protocol;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct Environment {
    clusters: Vec<Cluster>,
    modules: HashMap<String, Module>,
    storage_accounts: Vec<StorageAccount>,
    attributes: Vec<InfrastructureElement>,
    /// `protocol -> set of protocols reachable in one capability hop`,
    /// used to build the bounded-hop reachability check in §4.5 pruning
    /// rule (ii).
    protocol_adjacency: HashMap<Protocol, HashSet<Protocol>>,
}

impl Environment {
    pub fn build(
        clusters: Vec<Cluster>,
        modules: Vec<Module>,
        storage_accounts: Vec<StorageAccount>,
        attributes: Vec<InfrastructureElement>,
    ) -> Result<Self, DomainError> {
        for module in &modules {
            module.validate()?;
        }

        let modules: HashMap<String, Module> =
            modules.into_iter().map(|m| (m.name.clone(), m)).collect();

        let protocol_adjacency = build_protocol_adjacency(&modules);

        Ok(Self {
            clusters,
            modules,
            storage_accounts,
            attributes,
            protocol_adjacency,
        })
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn modules(&self) -> &HashMap<String, Module> {
        &self.modules
    }

    pub fn storage_accounts(&self) -> &[StorageAccount] {
        &self.storage_accounts
    }

    pub fn cluster(&self, name: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.name == name)
    }

    pub fn storage_account(&self, name: &str) -> Option<&StorageAccount> {
        self.storage_accounts.iter().find(|a| a.name == name)
    }

    /// Property-path attribute table for a cluster: its own metadata fields
    /// plus any infrastructure attributes indexed under
    /// `(object = Cluster, instance = name)`, per spec §4.2.
    pub fn cluster_attributes(&self, cluster: &Cluster) -> HashMap<String, AttributeValue> {
        let mut attrs: HashMap<String, AttributeValue> = cluster
            .metadata
            .iter()
            .map(|(k, v)| (k.clone(), AttributeValue::Text(v.clone())))
            .collect();
        self.overlay_infra_attributes(InfrastructureObject::Cluster, &cluster.name, &mut attrs);
        attrs
    }

    pub fn module_attributes(&self, module: &Module) -> HashMap<String, AttributeValue> {
        let mut attrs = HashMap::new();
        self.overlay_infra_attributes(InfrastructureObject::Module, &module.name, &mut attrs);
        attrs
    }

    pub fn storage_account_attributes(
        &self,
        account: &StorageAccount,
    ) -> HashMap<String, AttributeValue> {
        let mut attrs = HashMap::new();
        attrs.insert(
            "region".to_string(),
            AttributeValue::Text(account.region.clone()),
        );
        attrs.insert(
            "supportedConnection".to_string(),
            AttributeValue::Text(account.supported_connection.clone()),
        );
        self.overlay_infra_attributes(
            InfrastructureObject::StorageAccount,
            &account.name,
            &mut attrs,
        );
        attrs
    }

    fn overlay_infra_attributes(
        &self,
        object: InfrastructureObject,
        instance: &str,
        attrs: &mut HashMap<String, AttributeValue>,
    ) {
        for elem in &self.attributes {
            if elem.object == object && elem.instance == instance {
                attrs.insert(elem.attribute.clone(), to_attribute_value(&elem.value));
            }
        }
    }

    /// Whether `from` can reach `to` in at most `max_hops` capability hops,
    /// per the precomputed reachability table in §4.5.
    pub fn protocol_reachable(&self, from: &Protocol, to: &Protocol, max_hops: usize) -> bool {
        if from == to {
            return true;
        }
        let mut frontier: HashSet<&Protocol> = HashSet::new();
        frontier.insert(from);
        for _ in 0..max_hops {
            let mut next = HashSet::new();
            for p in &frontier {
                if let Some(neighbors) = self.protocol_adjacency.get(*p) {
                    for n in neighbors {
                        if n == to {
                            return true;
                        }
                        next.insert(n);
                    }
                }
            }
            if next.is_empty() {
                return false;
            }
            frontier = next;
        }
        false
    }
}

fn to_attribute_value(v: &crate::domain::model::InfrastructureValue) -> AttributeValue {
    use crate::domain::model::InfrastructureValue as IV;
    match v {
        IV::Numeric(n) => AttributeValue::Number(*n),
        IV::Text(t) => AttributeValue::Text(t.clone()),
        IV::Bool(b) => AttributeValue::Bool(*b),
    }
}

fn build_protocol_adjacency(
    modules: &HashMap<String, Module>,
) -> HashMap<Protocol, HashSet<Protocol>> {
    let mut adjacency: HashMap<Protocol, HashSet<Protocol>> = HashMap::new();
    for module in modules.values() {
        for cap in &module.capabilities {
            for pair in &cap.supported_interfaces {
                if let (Some(source), Some(sink)) = (&pair.source, &pair.sink) {
                    adjacency
                        .entry(source.protocol.clone())
                        .or_default()
                        .insert(sink.protocol.clone());
                }
            }
        }
    }
    adjacency
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Capability;
    use crate::domain::model::InterfacePair;
    use crate::domain::taxonomy::{CapabilityKind, DataFormat, Interface, Scope};

    fn iface(proto: &str) -> Interface {
        Interface::new(proto, DataFormat::named("csv"))
    }

    #[test]
    fn protocol_reachable_within_hops() {
        let copy_module = Module {
            name: "copy-mod".into(),
            capabilities: vec![Capability {
                kind: CapabilityKind::Copy,
                scope: Scope::Asset,
                supported_interfaces: vec![InterfacePair {
                    source: Some(iface("jdbc-db2")),
                    sink: Some(iface("s3")),
                }],
                supported_actions: vec![],
                plugins: vec![],
                api: None,
            }],
        };
        let env = Environment::build(vec![], vec![copy_module], vec![], vec![]).unwrap();
        assert!(env.protocol_reachable(&Protocol::new("jdbc-db2"), &Protocol::new("s3"), 1));
        assert!(!env.protocol_reachable(&Protocol::new("jdbc-db2"), &Protocol::new("arrow-flight"), 1));
    }

    #[test]
    fn cluster_attributes_overlay_infra_elements() {
        let cluster = Cluster {
            name: "eu-1".into(),
            metadata: [("region".to_string(), "eu".to_string())].into(),
        };
        let attrs = vec![InfrastructureElement {
            attribute: "cost".into(),
            object: InfrastructureObject::Cluster,
            instance: "eu-1".into(),
            value: crate::domain::model::InfrastructureValue::Numeric(12.0),
            units: None,
        }];
        let env = Environment::build(vec![cluster.clone()], vec![], vec![], attrs).unwrap();
        let table = env.cluster_attributes(&cluster);
        assert_eq!(table.get("region"), Some(&AttributeValue::Text("eu".into())));
        assert_eq!(table.get("cost"), Some(&AttributeValue::Number(12.0)));
    }
}
