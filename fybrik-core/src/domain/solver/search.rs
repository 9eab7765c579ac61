// fybrik-core/src/domain/solver/search.rs
//
// The structural backtracking enumerator, per spec §4.5: builds candidate
// chains left-to-right, pruning on deploy flags, restriction predicates and
// bounded-hop interface reachability. Action assignment is deliberately
// not done here — see `super::actions`.

use super::chain::ChainStep;
use super::flow_shape::{EndTarget, FlowShape, PinnedPosition};
use super::{actions, tie_break, MAX_PATH_LEN};
use crate::domain::environment::Environment;
use crate::domain::error::SolverDiagnostic;
use crate::domain::model::{AttributeValue, DataInfo, InterfacePair, Solution};
use crate::domain::taxonomy::{CapabilityKind, Protocol, Scope};
use std::collections::HashMap;

pub fn enumerate_chains(
    env: &Environment,
    data_info: &DataInfo,
    shape: &FlowShape,
    max_depth: usize,
    max_candidates: usize,
) -> Vec<Vec<ChainStep>> {
    let mut out = Vec::new();
    let mut chain = Vec::new();
    extend(
        env,
        data_info,
        shape,
        &mut chain,
        shape.start_interface.clone(),
        max_depth,
        max_candidates,
        &mut out,
    );
    out
}

#[allow(clippy::too_many_arguments)]
fn extend(
    env: &Environment,
    data_info: &DataInfo,
    shape: &FlowShape,
    chain: &mut Vec<ChainStep>,
    current_demand: crate::domain::taxonomy::Interface,
    max_depth: usize,
    max_candidates: usize,
    out: &mut Vec<Vec<ChainStep>>,
) {
    if out.len() >= max_candidates {
        return;
    }
    let position = chain.len();
    if position >= max_depth {
        return;
    }
    if prune_unreachable(env, shape, &current_demand, max_depth - position) {
        return;
    }

    let allowed = allowed_kinds(position, shape);

    let mut module_names: Vec<&String> = env.modules().keys().collect();
    module_names.sort();

    for module_name in module_names {
        let module = &env.modules()[module_name];
        let module_attrs = env.module_attributes(module);

        for (cap_idx, cap) in module.capabilities.iter().enumerate() {
            if !allowed.contains(&cap.kind) {
                continue;
            }
            let decision = data_info.decision_for(cap.kind);
            if decision.must_not_deploy() {
                continue;
            }
            if !decision.restrictions.modules_satisfied_by(&module_attrs) {
                continue;
            }
            if !decision
                .restrictions
                .scope_satisfied_by(&scope_attrs(cap.scope))
            {
                continue;
            }

            for pair in &cap.supported_interfaces {
                let Some(source) = &pair.source else {
                    continue;
                };
                if !source.matches(&current_demand) {
                    continue;
                }

                let mut clusters: Vec<&crate::domain::model::Cluster> =
                    env.clusters().iter().collect();
                clusters.sort_by(|a, b| a.name.cmp(&b.name));

                for cluster in clusters {
                    if cap.scope == Scope::Workload && cluster.name != data_info.context.workload_cluster
                    {
                        continue;
                    }
                    let cluster_attrs = env.cluster_attributes(cluster);
                    if !decision.restrictions.clusters_satisfied_by(&cluster_attrs) {
                        continue;
                    }

                    let persists = matches!(cap.kind, CapabilityKind::Copy | CapabilityKind::Write);

                    if persists {
                        let mut accounts: Vec<&crate::domain::model::StorageAccount> =
                            env.storage_accounts().iter().collect();
                        accounts.sort_by(|a, b| a.name.cmp(&b.name));
                        for account in accounts {
                            if !connection_matches(pair.sink.as_ref(), account) {
                                continue;
                            }
                            let account_attrs = env.storage_account_attributes(account);
                            if !decision
                                .restrictions
                                .storage_accounts_satisfied_by(&account_attrs)
                            {
                                continue;
                            }
                            let step = ChainStep {
                                module: module.name.clone(),
                                capability_index: cap_idx,
                                capability_kind: cap.kind,
                                cluster: cluster.name.clone(),
                                account: Some(account.name.clone()),
                                source_interface: pair.source.clone(),
                                sink_interface: pair.sink.clone(),
                            };
                            consider_step(
                                env,
                                data_info,
                                shape,
                                chain,
                                step,
                                pair,
                                position,
                                max_depth,
                                max_candidates,
                                out,
                            );
                            if out.len() >= max_candidates {
                                return;
                            }
                        }
                    } else {
                        let step = ChainStep {
                            module: module.name.clone(),
                            capability_index: cap_idx,
                            capability_kind: cap.kind,
                            cluster: cluster.name.clone(),
                            account: None,
                            source_interface: pair.source.clone(),
                            sink_interface: pair.sink.clone(),
                        };
                        consider_step(
                            env,
                            data_info,
                            shape,
                            chain,
                            step,
                            pair,
                            position,
                            max_depth,
                            max_candidates,
                            out,
                        );
                        if out.len() >= max_candidates {
                            return;
                        }
                    }
                }
            }
        }
    }
}

/// Tries ending the chain at `step` (if it satisfies the flow's end
/// target) and, independently, continuing the search from its sink.
/// A read-facing edge (kind `read`) never continues: it is always the
/// workload boundary.
#[allow(clippy::too_many_arguments)]
fn consider_step(
    env: &Environment,
    data_info: &DataInfo,
    shape: &FlowShape,
    chain: &mut Vec<ChainStep>,
    step: ChainStep,
    pair: &InterfacePair,
    position: usize,
    max_depth: usize,
    max_candidates: usize,
    out: &mut Vec<Vec<ChainStep>>,
) {
    if out.len() >= max_candidates {
        return;
    }

    if terminates(shape, step.capability_kind, pair) {
        let mut terminal = chain.clone();
        terminal.push(step.clone());
        out.push(terminal);
        if out.len() >= max_candidates {
            return;
        }
    }

    if step.capability_kind != CapabilityKind::Read && position + 1 < max_depth {
        if let Some(sink) = pair.sink.clone() {
            chain.push(step);
            extend(env, data_info, shape, chain, sink, max_depth, max_candidates, out);
            chain.pop();
        }
    }
}

fn allowed_kinds(position: usize, shape: &FlowShape) -> Vec<CapabilityKind> {
    if position == 0 {
        match shape.pinned_position {
            PinnedPosition::First => vec![shape.pinned_kind],
            PinnedPosition::Last => {
                vec![CapabilityKind::Copy, CapabilityKind::Transform, shape.pinned_kind]
            }
        }
    } else {
        let mut kinds = vec![CapabilityKind::Copy, CapabilityKind::Transform];
        if shape.pinned_position == PinnedPosition::Last {
            kinds.push(shape.pinned_kind);
        }
        kinds
    }
}

fn terminates(shape: &FlowShape, kind: CapabilityKind, pair: &InterfacePair) -> bool {
    match &shape.end {
        EndTarget::Interface(target) => {
            let sink_matches = pair.sink.as_ref().map(|s| s.matches(target)).unwrap_or(false);
            sink_matches && (shape.pinned_position != PinnedPosition::Last || kind == shape.pinned_kind)
        }
        EndTarget::AnyStorageAccount => matches!(kind, CapabilityKind::Copy | CapabilityKind::Write),
        EndTarget::Immediate => false,
    }
}

fn connection_matches(
    sink: Option<&crate::domain::taxonomy::Interface>,
    account: &crate::domain::model::StorageAccount,
) -> bool {
    match sink {
        None => true,
        Some(sink) => sink.protocol == Protocol::new(account.supported_connection.clone()),
    }
}

fn scope_attrs(scope: Scope) -> HashMap<String, AttributeValue> {
    let mut attrs = HashMap::new();
    attrs.insert("scope".to_string(), AttributeValue::Text(scope.to_string()));
    attrs
}

/// Pruning rule (ii): abandon a branch whose demand cannot reach the end
/// target within the hops remaining.
fn prune_unreachable(
    env: &Environment,
    shape: &FlowShape,
    current_demand: &crate::domain::taxonomy::Interface,
    remaining_depth: usize,
) -> bool {
    match &shape.end {
        EndTarget::Interface(target) => {
            !env.protocol_reachable(&current_demand.protocol, &target.protocol, remaining_depth)
        }
        EndTarget::AnyStorageAccount => !env.storage_accounts().iter().any(|a| {
            let proto = Protocol::new(a.supported_connection.clone());
            env.protocol_reachable(&current_demand.protocol, &proto, remaining_depth)
        }),
        EndTarget::Immediate => false,
    }
}

/// Delete flows are always a single, fixed-length edge: the table defines
/// no "last edge sink" for them, so there's no continuation to search.
pub fn solve_delete(
    env: &Environment,
    data_info: &DataInfo,
    shape: &FlowShape,
) -> Result<Solution, SolverDiagnostic> {
    let mut best: Option<Solution> = None;
    let mut last_error = None;
    let mut any_structural = false;

    let mut module_names: Vec<&String> = env.modules().keys().collect();
    module_names.sort();

    for module_name in module_names {
        let module = &env.modules()[module_name];
        let module_attrs = env.module_attributes(module);

        for (cap_idx, cap) in module.capabilities.iter().enumerate() {
            if cap.kind != shape.pinned_kind {
                continue;
            }
            let decision = data_info.decision_for(cap.kind);
            if decision.must_not_deploy() {
                continue;
            }
            if !decision.restrictions.modules_satisfied_by(&module_attrs) {
                continue;
            }
            if !decision
                .restrictions
                .scope_satisfied_by(&scope_attrs(cap.scope))
            {
                continue;
            }

            for pair in &cap.supported_interfaces {
                let Some(source) = &pair.source else {
                    continue;
                };
                if !source.matches(&shape.start_interface) {
                    continue;
                }

                let mut clusters: Vec<&crate::domain::model::Cluster> =
                    env.clusters().iter().collect();
                clusters.sort_by(|a, b| a.name.cmp(&b.name));

                for cluster in clusters {
                    if cap.scope == Scope::Workload && cluster.name != data_info.context.workload_cluster
                    {
                        continue;
                    }
                    let cluster_attrs = env.cluster_attributes(cluster);
                    if !decision.restrictions.clusters_satisfied_by(&cluster_attrs) {
                        continue;
                    }
                    any_structural = true;

                    let step = ChainStep {
                        module: module.name.clone(),
                        capability_index: cap_idx,
                        capability_kind: cap.kind,
                        cluster: cluster.name.clone(),
                        account: None,
                        source_interface: pair.source.clone(),
                        sink_interface: pair.sink.clone(),
                    };

                    match actions::assign(env, data_info, std::slice::from_ref(&step)) {
                        Ok(edges) => {
                            let solution = Solution { edges };
                            if !super::satisfies_mandatory_deploys(data_info, &solution) {
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
            }
        }
    }

    best.ok_or_else(|| {
        if !any_structural {
            SolverDiagnostic::NoEndpointModule {
                flow: shape.flow_name.clone(),
            }
        } else {
            last_error.unwrap_or(SolverDiagnostic::SearchExhausted { max_depth: 1 })
        }
    })
}

/// Best-effort diagnosis when the structural search produced zero
/// candidates: distinguishes "no module offers this endpoint at all" from
/// "reachable in principle but restrictions excluded every candidate".
pub fn diagnose_no_candidates(
    env: &Environment,
    _data_info: &DataInfo,
    shape: &FlowShape,
) -> SolverDiagnostic {
    let has_pinned_capability = env.modules().values().any(|m| {
        m.capabilities.iter().any(|c| {
            c.kind == shape.pinned_kind
                && c.supported_interfaces.iter().any(|p| match shape.pinned_position {
                    PinnedPosition::First => p
                        .source
                        .as_ref()
                        .map(|s| s.matches(&shape.start_interface))
                        .unwrap_or(false),
                    PinnedPosition::Last => true,
                })
        })
    });

    if !has_pinned_capability {
        return SolverDiagnostic::NoEndpointModule {
            flow: shape.flow_name.clone(),
        };
    }

    if let EndTarget::Interface(target) = &shape.end {
        if !env.protocol_reachable(&shape.start_interface.protocol, &target.protocol, MAX_PATH_LEN) {
            return SolverDiagnostic::InterfaceUnreachable {
                source: shape.start_interface.protocol.to_string(),
                sink: target.protocol.to_string(),
                max_hops: MAX_PATH_LEN,
            };
        }
    }

    SolverDiagnostic::RestrictionExcludesAll {
        restriction_kind: "cluster-or-module".to_string(),
        depth: MAX_PATH_LEN,
    }
}
