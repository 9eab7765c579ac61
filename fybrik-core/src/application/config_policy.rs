// fybrik-core/src/application/config_policy.rs
//
// Component C: the Config-Policy Evaluator, per spec §4.2. The rego-backed
// admin evaluator is out of scope; `DefaultConfigPolicyEvaluator` models
// the five hard-coded rules from `pkg/adminconfig/default_evaluator.go` as
// data rather than an if-chain, per SPEC_FULL's supplemented features.

use crate::domain::environment::Environment;
use crate::domain::model::{Decision, DeployStatus, Predicate, PredicateValue, Restrictions};
use crate::domain::taxonomy::{CapabilityKind, FlowType};
use crate::error::FybrikError;
use std::collections::{HashMap, HashSet};

/// The request context the default evaluator needs, per spec §4.2's
/// `Evaluate(request, workloadContext)` contract.
#[derive(Debug, Clone)]
pub struct ConfigPolicyRequest {
    pub dataset_id: String,
    /// The set of flows this dataset is used in across the whole request
    /// (a dataset can be both read and copied within one application).
    pub usage: HashSet<FlowType>,
    /// The asset's geography, absent for new-asset writes.
    pub asset_geography: Option<String>,
    pub required_action_count: usize,
    pub workload_cluster: String,
}

#[derive(Debug, Clone)]
pub struct ConfigPolicyOutput {
    pub valid: bool,
    pub decisions: HashMap<CapabilityKind, Decision>,
}

pub trait ConfigPolicyEvaluator: Send + Sync {
    fn evaluate(
        &self,
        request: &ConfigPolicyRequest,
        env: &Environment,
    ) -> Result<ConfigPolicyOutput, FybrikError>;
}

/// The built-in, rule-table evaluator used when no external admin-config
/// policy is wired up.
pub struct DefaultConfigPolicyEvaluator;

impl ConfigPolicyEvaluator for DefaultConfigPolicyEvaluator {
    fn evaluate(
        &self,
        request: &ConfigPolicyRequest,
        env: &Environment,
    ) -> Result<ConfigPolicyOutput, FybrikError> {
        let mut decisions = HashMap::new();

        // Read is deployed only in a read-type scenario, pinned to the
        // workload's own scope (the solver enforces the cluster pin via
        // `DataContext::workload_cluster`; this restriction additionally
        // excludes any non-workload-scoped read capability).
        let deploy_read = request.usage.contains(&FlowType::Read);
        decisions.insert(
            CapabilityKind::Read,
            Decision {
                deploy: Some(if deploy_read { DeployStatus::True } else { DeployStatus::False }),
                restrictions: Restrictions {
                    scope: vec![Predicate::new("scope", PredicateValue::OneOf(vec!["workload".into()]))],
                    ..Default::default()
                },
            },
        );

        // Write is not yet supported by the default policy and so never deploys.
        decisions.insert(CapabilityKind::Write, Decision {
            deploy: Some(DeployStatus::False),
            restrictions: Restrictions::default(),
        });

        let workload_region = env
            .cluster(&request.workload_cluster)
            .and_then(|c| c.region())
            .map(str::to_string);

        let clusters_in_region: Vec<String> = request
            .asset_geography
            .as_deref()
            .map(|geography| {
                env.clusters()
                    .iter()
                    .filter(|c| c.region() == Some(geography))
                    .map(|c| c.name.clone())
                    .collect()
            })
            .unwrap_or_default();

        let mut copy_decision = Decision::unconstrained();
        if request.usage.contains(&FlowType::Copy) {
            copy_decision.deploy = Some(DeployStatus::True);
        }

        // Copy is also forced when the asset's geography differs from the
        // workload's and governance requires actions on a read flow: the
        // redaction must happen close to the data before it leaves its region.
        let cross_region = match (&workload_region, &request.asset_geography) {
            (Some(w), Some(g)) => w != g,
            _ => false,
        };
        if deploy_read && request.required_action_count > 0 && cross_region {
            copy_decision.deploy = Some(DeployStatus::True);
            copy_decision.restrictions.clusters =
                vec![Predicate::new("region", PredicateValue::OneOf(clusters_in_region.clone()))];
        }

        // Transforms always run close to the data, restricted to its region.
        let mut transform_decision = Decision::unconstrained();
        transform_decision.restrictions.clusters =
            vec![Predicate::new("region", PredicateValue::OneOf(clusters_in_region))];

        decisions.insert(CapabilityKind::Transform, transform_decision);
        decisions.insert(CapabilityKind::Copy, copy_decision);

        Ok(ConfigPolicyOutput { valid: true, decisions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Cluster;

    fn env_with_clusters() -> Environment {
        Environment::build(
            vec![
                Cluster {
                    name: "cluster-a".into(),
                    metadata: [("region".to_string(), "region-a".to_string())].into(),
                },
                Cluster {
                    name: "cluster-b".into(),
                    metadata: [("region".to_string(), "region-b".to_string())].into(),
                },
            ],
            vec![],
            vec![],
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn read_deploys_only_when_requested_and_pinned_to_workload_scope() {
        let evaluator = DefaultConfigPolicyEvaluator;
        let env = env_with_clusters();
        let request = ConfigPolicyRequest {
            dataset_id: "ds1".into(),
            usage: [FlowType::Read].into_iter().collect(),
            asset_geography: Some("region-a".into()),
            required_action_count: 0,
            workload_cluster: "cluster-a".into(),
        };
        let output = evaluator.evaluate(&request, &env).unwrap();
        let read = &output.decisions[&CapabilityKind::Read];
        assert_eq!(read.deploy, Some(DeployStatus::True));
        assert_eq!(read.restrictions.scope.len(), 1);

        let request_no_read = ConfigPolicyRequest {
            usage: [FlowType::Copy].into_iter().collect(),
            ..request
        };
        let output = evaluator.evaluate(&request_no_read, &env).unwrap();
        assert_eq!(output.decisions[&CapabilityKind::Read].deploy, Some(DeployStatus::False));
    }

    #[test]
    fn write_never_deploys_by_default() {
        let evaluator = DefaultConfigPolicyEvaluator;
        let env = env_with_clusters();
        let request = ConfigPolicyRequest {
            dataset_id: "ds1".into(),
            usage: [FlowType::Write].into_iter().collect(),
            asset_geography: None,
            required_action_count: 0,
            workload_cluster: "cluster-a".into(),
        };
        let output = evaluator.evaluate(&request, &env).unwrap();
        assert_eq!(output.decisions[&CapabilityKind::Write].deploy, Some(DeployStatus::False));
    }

    #[test]
    fn copy_forced_when_read_crosses_region_with_actions() {
        let evaluator = DefaultConfigPolicyEvaluator;
        let env = env_with_clusters();
        let request = ConfigPolicyRequest {
            dataset_id: "ds1".into(),
            usage: [FlowType::Read].into_iter().collect(),
            asset_geography: Some("region-b".into()),
            required_action_count: 1,
            workload_cluster: "cluster-a".into(),
        };
        let output = evaluator.evaluate(&request, &env).unwrap();
        let copy = &output.decisions[&CapabilityKind::Copy];
        assert_eq!(copy.deploy, Some(DeployStatus::True));
        assert_eq!(
            copy.restrictions.clusters,
            vec![Predicate::new("region", PredicateValue::OneOf(vec!["cluster-b".into()]))]
        );
    }

    #[test]
    fn copy_not_forced_without_actions() {
        let evaluator = DefaultConfigPolicyEvaluator;
        let env = env_with_clusters();
        let request = ConfigPolicyRequest {
            dataset_id: "ds1".into(),
            usage: [FlowType::Read].into_iter().collect(),
            asset_geography: Some("region-b".into()),
            required_action_count: 0,
            workload_cluster: "cluster-a".into(),
        };
        let output = evaluator.evaluate(&request, &env).unwrap();
        assert_eq!(output.decisions[&CapabilityKind::Copy].deploy, Some(DeployStatus::Unknown));
    }
}
