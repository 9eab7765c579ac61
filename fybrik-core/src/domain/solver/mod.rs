// fybrik-core/src/domain/solver/mod.rs
//
// Component F: the Path Solver. A depth-bounded backtracking enumerator
// that searches for a feasible linear data path, per spec §4.5.
//
// The search is split into two decoupled passes:
//   1. `search::enumerate_chains` builds all structurally feasible edge
//      chains (interfaces, clusters, accounts, restriction predicates,
//      deploy flags) without touching action assignment.
//   2. `actions::assign` takes one structural chain and tries to realize
//      the action-assignment constraint (§4.1) over it, honoring the
//      transform-close-to-data tie-break and the plugin-companion rule.
// `tie_break` ranks the resulting complete [`Solution`]s deterministically.

mod actions;
mod chain;
mod flow_shape;
mod search;
mod tie_break;

use crate::domain::environment::Environment;
use crate::domain::error::SolverDiagnostic;
use crate::domain::model::{DataInfo, Solution};

pub use chain::ChainStep;
pub use flow_shape::{EndTarget, FlowShape, PinnedPosition};

/// Path length bound, per spec §4.5.
pub const MAX_PATH_LEN: usize = 4;

/// A cap on the number of structural candidates fully explored before
/// giving up on finding a better tie-break winner. Realistic fleets
/// (dozens of modules/clusters/accounts, depth <= 4) stay far below this;
/// it only guards against pathological fan-out.
const MAX_CANDIDATES: usize = 2048;

pub struct PathSolver;

impl PathSolver {
    /// Search for a feasible [`Solution`] for one asset's [`DataInfo`]
    /// against an [`Environment`] snapshot. Pure: no logging, no I/O.
    pub fn solve(env: &Environment, data_info: &DataInfo) -> Result<Solution, SolverDiagnostic> {
        let shape = flow_shape::FlowShape::for_flow(data_info)?;

        if let flow_shape::EndTarget::Immediate = shape.end {
            return search::solve_delete(env, data_info, &shape);
        }

        let candidates = search::enumerate_chains(env, data_info, &shape, MAX_PATH_LEN, MAX_CANDIDATES);

        let mut best: Option<Solution> = None;
        let mut last_error: Option<SolverDiagnostic> = None;

        for chain in &candidates {
            match actions::assign(env, data_info, chain) {
                Ok(edges) => {
                    let solution = Solution { edges };
                    if !satisfies_mandatory_deploys(data_info, &solution) {
                        continue;
                    }
                    best = Some(match best {
                        None => solution,
                        Some(current) => tie_break::better(env, current, solution),
                    });
                }
                Err(e) => last_error = Some(e),
            }
        }

        best.ok_or_else(|| {
            if candidates.is_empty() {
                search::diagnose_no_candidates(env, data_info, &shape)
            } else {
                last_error.unwrap_or(SolverDiagnostic::SearchExhausted {
                    max_depth: MAX_PATH_LEN,
                })
            }
        })
    }
}

/// Every capability kind whose [`Decision::deploy`](crate::domain::model::DeployStatus)
/// is `True` must appear somewhere in the solution, per spec §4.2.
fn satisfies_mandatory_deploys(data_info: &DataInfo, solution: &Solution) -> bool {
    for (kind, decision) in &data_info.configuration {
        if decision.must_deploy() && !solution.edges.iter().any(|e| e.capability_kind == *kind) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{
        AssetDetails, Capability, Cluster, DataContext, Decision, DeployStatus,
        InfrastructureElement, InfrastructureObject, InfrastructureValue, InterfacePair, Module,
        Predicate, PredicateValue, Restrictions, StorageAccount,
    };
    use crate::domain::taxonomy::{Action, DataFormat, FlowType, Interface, Scope};
    use std::collections::HashMap;

    fn iface(proto: &str) -> Interface {
        Interface::new(proto, DataFormat::named("csv"))
    }

    fn read_data_info(asset_iface: Interface, requested: Interface) -> DataInfo {
        read_data_info_on(asset_iface, requested, "eu-1")
    }

    fn read_data_info_on(asset_iface: Interface, requested: Interface, workload_cluster: &str) -> DataInfo {
        DataInfo {
            context: DataContext {
                dataset_id: "ds1".into(),
                flow: FlowType::Read,
                requested_interface: requested,
                is_new_data_set: false,
                workload_cluster: workload_cluster.into(),
            },
            asset_details: Some(AssetDetails {
                current_interface: asset_iface,
                geography: "eu".into(),
            }),
            required_actions: vec![],
            storage_actions_by_location: HashMap::new(),
            configuration: HashMap::new(),
        }
    }

    fn read_module(source: &str, sink: &str, supported_actions: Vec<&str>) -> Module {
        Module {
            name: format!("read-{source}"),
            capabilities: vec![Capability {
                kind: CapabilityKind::Read,
                scope: Scope::Workload,
                supported_interfaces: vec![InterfacePair {
                    source: Some(iface(source)),
                    sink: Some(iface(sink)),
                }],
                supported_actions: supported_actions.into_iter().map(Into::into).collect(),
                plugins: vec![],
                api: Some(iface(sink)),
            }],
        }
    }

    fn copy_module(name: &str, source: &str, sink: &str, supported_actions: Vec<&str>) -> Module {
        Module {
            name: name.into(),
            capabilities: vec![Capability {
                kind: CapabilityKind::Copy,
                scope: Scope::Asset,
                supported_interfaces: vec![InterfacePair {
                    source: Some(iface(source)),
                    sink: Some(iface(sink)),
                }],
                supported_actions: supported_actions.into_iter().map(Into::into).collect(),
                plugins: vec![],
                api: None,
            }],
        }
    }

    fn delete_module(source: &str) -> Module {
        Module {
            name: "delete-mod".into(),
            capabilities: vec![Capability {
                kind: CapabilityKind::Delete,
                scope: Scope::Asset,
                supported_interfaces: vec![InterfacePair {
                    source: Some(iface(source)),
                    sink: None,
                }],
                supported_actions: vec![],
                plugins: vec![],
                api: None,
            }],
        }
    }

    fn write_module(name: &str, source: &str, sink: &str) -> Module {
        Module {
            name: name.into(),
            capabilities: vec![Capability {
                kind: CapabilityKind::Write,
                scope: Scope::Workload,
                supported_interfaces: vec![InterfacePair {
                    source: Some(iface(source)),
                    sink: Some(iface(sink)),
                }],
                supported_actions: vec![],
                plugins: vec![],
                api: Some(iface(source)),
            }],
        }
    }

    #[test]
    fn scenario1_empty_environment_read_fails_with_no_endpoint() {
        let env = Environment::build(vec![], vec![], vec![], vec![]).unwrap();
        let data_info = read_data_info(iface("jdbc-db2"), iface("arrow-flight"));
        let err = PathSolver::solve(&env, &data_info).unwrap_err();
        assert!(matches!(err, SolverDiagnostic::NoEndpointModule { .. }));
    }

    #[test]
    fn scenario2_copy_then_read_carries_transform_actions_on_copy() {
        let copy = copy_module("copy-mod", "jdbc-db2", "s3", vec!["redact"]);
        let read = read_module("s3", "arrow-flight", vec![]);
        let account = StorageAccount {
            name: "acct1".into(),
            region: "eu".into(),
            supported_connection: "s3".into(),
            secret_ref: "sec1".into(),
        };
        let env = Environment::build(
            vec![Cluster {
                name: "eu-1".into(),
                metadata: HashMap::new(),
            }],
            vec![copy, read],
            vec![account],
            vec![],
        )
        .unwrap();

        let mut data_info = read_data_info(iface("jdbc-db2"), iface("arrow-flight"));
        data_info.required_actions = vec![Action::dataset("redact")];

        let solution = PathSolver::solve(&env, &data_info).unwrap();
        assert_eq!(solution.len(), 2);
        assert_eq!(solution.edges[0].capability_kind, CapabilityKind::Copy);
        assert_eq!(solution.edges[0].actions.len(), 1);
        assert_eq!(solution.edges[1].capability_kind, CapabilityKind::Read);
        assert!(solution.edges[1].actions.is_empty());
    }

    #[test]
    fn scenario3_wrong_source_protocol_fails_then_succeeds_once_added() {
        let s3_read_only = read_module("s3", "arrow-flight", vec![]);
        let env = Environment::build(vec![], vec![s3_read_only], vec![], vec![]).unwrap();
        let data_info = read_data_info(iface("jdbc-db2"), iface("arrow-flight"));
        assert!(PathSolver::solve(&env, &data_info).is_err());

        let both = vec![
            read_module("s3", "arrow-flight", vec![]),
            read_module("jdbc-db2", "arrow-flight", vec![]),
        ];
        let env2 = Environment::build(
            vec![Cluster {
                name: "eu-1".into(),
                metadata: HashMap::new(),
            }],
            both,
            vec![],
            vec![],
        )
        .unwrap();
        let solution = PathSolver::solve(&env2, &data_info).unwrap();
        assert_eq!(solution.len(), 1);
        assert_eq!(solution.edges[0].module, "read-jdbc-db2");
    }

    #[test]
    fn scenario4_governance_region_restriction_picks_allowed_account() {
        let copy = copy_module("copy-mod", "jdbc-db2", "s3", vec![]);
        let allowed = StorageAccount {
            name: "allowed-acct".into(),
            region: "eu".into(),
            supported_connection: "s3".into(),
            secret_ref: "sec1".into(),
        };
        let forbidden = StorageAccount {
            name: "forbidden-acct".into(),
            region: "us".into(),
            supported_connection: "s3".into(),
            secret_ref: "sec2".into(),
        };
        let env = Environment::build(
            vec![Cluster {
                name: "eu-1".into(),
                metadata: HashMap::new(),
            }],
            vec![copy],
            vec![allowed, forbidden],
            vec![],
        )
        .unwrap();

        let mut configuration = HashMap::new();
        configuration.insert(
            CapabilityKind::Copy,
            Decision {
                deploy: Some(DeployStatus::Unknown),
                restrictions: Restrictions {
                    storage_accounts: vec![Predicate::new(
                        "region",
                        PredicateValue::OneOf(vec!["eu".into()]),
                    )],
                    ..Default::default()
                },
            },
        );
        let data_info = DataInfo {
            context: DataContext {
                dataset_id: "ds1".into(),
                flow: FlowType::Copy,
                requested_interface: iface("s3"),
                is_new_data_set: false,
                workload_cluster: "eu-1".into(),
            },
            asset_details: Some(AssetDetails {
                current_interface: iface("jdbc-db2"),
                geography: "eu".into(),
            }),
            required_actions: vec![],
            storage_actions_by_location: HashMap::new(),
            configuration,
        };

        let solution = PathSolver::solve(&env, &data_info).unwrap();
        assert_eq!(solution.len(), 1);
        assert_eq!(solution.edges[0].storage_account, Some("allowed-acct".to_string()));
    }

    #[test]
    fn scenario5_cost_restriction_widens_to_succeed() {
        let copy = copy_module("copy-mod", "jdbc-db2", "s3", vec![]);
        let acct1 = StorageAccount {
            name: "acct1".into(),
            region: "eu".into(),
            supported_connection: "s3".into(),
            secret_ref: "sec1".into(),
        };
        let acct2 = StorageAccount {
            name: "acct2".into(),
            region: "eu".into(),
            supported_connection: "s3".into(),
            secret_ref: "sec2".into(),
        };
        let attributes = vec![
            InfrastructureElement {
                attribute: "cost".into(),
                object: InfrastructureObject::StorageAccount,
                instance: "acct1".into(),
                value: InfrastructureValue::Numeric(20.0),
                units: None,
            },
            InfrastructureElement {
                attribute: "cost".into(),
                object: InfrastructureObject::StorageAccount,
                instance: "acct2".into(),
                value: InfrastructureValue::Numeric(12.0),
                units: None,
            },
        ];
        let env = Environment::build(
            vec![Cluster {
                name: "eu-1".into(),
                metadata: HashMap::new(),
            }],
            vec![copy],
            vec![acct1, acct2],
            attributes,
        )
        .unwrap();

        let data_info_for = |max: f64| {
            let mut configuration = HashMap::new();
            configuration.insert(
                CapabilityKind::Copy,
                Decision {
                    deploy: Some(DeployStatus::Unknown),
                    restrictions: Restrictions {
                        storage_accounts: vec![Predicate::new(
                            "cost",
                            PredicateValue::Range {
                                min: None,
                                max: Some(max),
                            },
                        )],
                        ..Default::default()
                    },
                },
            );
            DataInfo {
                context: DataContext {
                    dataset_id: "ds1".into(),
                    flow: FlowType::Copy,
                    requested_interface: iface("s3"),
                    is_new_data_set: false,
                    workload_cluster: "eu-1".into(),
                },
                asset_details: Some(AssetDetails {
                    current_interface: iface("jdbc-db2"),
                    geography: "eu".into(),
                }),
                required_actions: vec![],
                storage_actions_by_location: HashMap::new(),
                configuration,
            }
        };

        assert!(PathSolver::solve(&env, &data_info_for(10.0)).is_err());
        let solution = PathSolver::solve(&env, &data_info_for(15.0)).unwrap();
        assert_eq!(solution.edges[0].storage_account, Some("acct2".to_string()));
    }

    #[test]
    fn scenario6_write_new_region_pin_selects_account() {
        let write = write_module("write-mod", "arrow-flight", "s3");
        let acct1 = StorageAccount {
            name: "acct1".into(),
            region: "us".into(),
            supported_connection: "s3".into(),
            secret_ref: "sec1".into(),
        };
        let acct2 = StorageAccount {
            name: "acct2".into(),
            region: "eu".into(),
            supported_connection: "s3".into(),
            secret_ref: "sec2".into(),
        };
        let env = Environment::build(
            vec![Cluster {
                name: "eu-1".into(),
                metadata: HashMap::new(),
            }],
            vec![write],
            vec![acct1, acct2],
            vec![],
        )
        .unwrap();

        let mut configuration = HashMap::new();
        configuration.insert(
            CapabilityKind::Write,
            Decision {
                deploy: Some(DeployStatus::Unknown),
                restrictions: Restrictions {
                    storage_accounts: vec![Predicate::new(
                        "region",
                        PredicateValue::OneOf(vec!["eu".into()]),
                    )],
                    ..Default::default()
                },
            },
        );
        let data_info = DataInfo {
            context: DataContext {
                dataset_id: "ds1".into(),
                flow: FlowType::Write,
                requested_interface: iface("arrow-flight"),
                is_new_data_set: true,
                workload_cluster: "eu-1".into(),
            },
            asset_details: None,
            required_actions: vec![],
            storage_actions_by_location: HashMap::new(),
            configuration,
        };

        let solution = PathSolver::solve(&env, &data_info).unwrap();
        assert_eq!(solution.len(), 1);
        assert_eq!(solution.edges[0].module, "write-mod");
        assert_eq!(solution.edges[0].storage_account, Some("acct2".to_string()));
    }

    #[test]
    fn scenario7_delete_flow_picks_single_delete_module() {
        let env = Environment::build(
            vec![Cluster {
                name: "eu-1".into(),
                metadata: HashMap::new(),
            }],
            vec![delete_module("jdbc-db2")],
            vec![],
            vec![],
        )
        .unwrap();
        let data_info = DataInfo {
            context: DataContext {
                dataset_id: "ds1".into(),
                flow: FlowType::Delete,
                requested_interface: iface("jdbc-db2"),
                is_new_data_set: false,
                workload_cluster: "eu-1".into(),
            },
            asset_details: Some(AssetDetails {
                current_interface: iface("jdbc-db2"),
                geography: "eu".into(),
            }),
            required_actions: vec![],
            storage_actions_by_location: HashMap::new(),
            configuration: HashMap::new(),
        };

        let solution = PathSolver::solve(&env, &data_info).unwrap();
        assert_eq!(solution.len(), 1);
        assert_eq!(solution.edges[0].capability_kind, CapabilityKind::Delete);
    }

    #[test]
    fn scenario8_transform_close_to_data_across_regions() {
        let copy = copy_module("copy-mod", "jdbc-db2", "s3", vec!["redact"]);
        let read = read_module("s3", "arrow-flight", vec![]);
        let account = StorageAccount {
            name: "acct1".into(),
            region: "region-b".into(),
            supported_connection: "s3".into(),
            secret_ref: "sec1".into(),
        };
        let region_a = Cluster {
            name: "cluster-a".into(),
            metadata: [("region".to_string(), "region-a".to_string())].into(),
        };
        let region_b = Cluster {
            name: "cluster-b".into(),
            metadata: [("region".to_string(), "region-b".to_string())].into(),
        };
        let env = Environment::build(
            vec![region_a, region_b],
            vec![copy, read],
            vec![account],
            vec![],
        )
        .unwrap();

        let mut configuration = HashMap::new();
        configuration.insert(
            CapabilityKind::Copy,
            Decision {
                deploy: Some(DeployStatus::Unknown),
                restrictions: Restrictions {
                    clusters: vec![Predicate::new(
                        "region",
                        PredicateValue::OneOf(vec!["region-b".into()]),
                    )],
                    ..Default::default()
                },
            },
        );
        let mut data_info = read_data_info_on(iface("jdbc-db2"), iface("arrow-flight"), "cluster-a");
        data_info.required_actions = vec![Action::dataset("redact")];
        data_info.configuration = configuration;

        let solution = PathSolver::solve(&env, &data_info).unwrap();
        assert_eq!(solution.len(), 2);
        assert_eq!(solution.edges[0].cluster, "cluster-b");
        assert_eq!(solution.edges[0].actions.len(), 1);
        assert!(solution.edges[1].actions.is_empty());
    }
}
