// fybrik-core/src/domain/solver/actions.rs
//
// The action-assignment constraint, per spec §4.1 and the transform-
// close-to-data tie-break in §4.5: every required action is assigned to
// exactly one edge capable of performing it, actions mandated for a
// storage location are pinned to the edge that lands there, and the
// remaining actions are pushed as close to the data as the flow allows.

use super::chain::ChainStep;
use crate::domain::environment::Environment;
use crate::domain::error::SolverDiagnostic;
use crate::domain::model::{Capability, ResolvedEdge};
use crate::domain::taxonomy::{CapabilityKind, FlowType};
use std::collections::HashSet;

use crate::domain::model::DataInfo;

fn capability_of<'a>(env: &'a Environment, step: &ChainStep) -> &'a Capability {
    &env.modules()[&step.module].capabilities[step.capability_index]
}

pub fn assign(
    env: &Environment,
    data_info: &DataInfo,
    chain: &[ChainStep],
) -> Result<Vec<ResolvedEdge>, SolverDiagnostic> {
    let mut assigned: Vec<HashSet<usize>> = vec![HashSet::new(); chain.len()];

    assign_mandatory_storage_actions(env, data_info, chain, &mut assigned)?;
    distribute_remaining_actions(env, data_info, chain, &mut assigned)?;
    verify_plugin_companions(env, data_info, chain, &assigned)?;

    Ok(chain
        .iter()
        .enumerate()
        .map(|(i, step)| {
            // `assigned[i]` is a `HashSet`, whose iteration order is
            // randomized per run; sort by required-action position so two
            // solves of the same input always emit the same action order.
            let mut indices: Vec<usize> = assigned[i].iter().copied().collect();
            indices.sort_unstable();
            ResolvedEdge {
                module: step.module.clone(),
                capability_index: step.capability_index,
                capability_kind: step.capability_kind,
                cluster: step.cluster.clone(),
                storage_account: step.account.clone(),
                source_interface: step.source_interface.clone(),
                sink_interface: step.sink_interface.clone(),
                actions: indices.into_iter().map(|idx| data_info.required_actions[idx].clone()).collect(),
            }
        })
        .collect())
}

/// Edge feasibility rule (4): an edge persisting into a storage account
/// whose region names a governance storage-action entry must carry those
/// actions, restricted to what the capability can actually perform.
fn assign_mandatory_storage_actions(
    env: &Environment,
    data_info: &DataInfo,
    chain: &[ChainStep],
    assigned: &mut [HashSet<usize>],
) -> Result<(), SolverDiagnostic> {
    for (i, step) in chain.iter().enumerate() {
        let Some(account_name) = &step.account else {
            continue;
        };
        let Some(account) = env.storage_account(account_name) else {
            continue;
        };
        let Some(required_here) = data_info.storage_actions_by_location.get(&account.region) else {
            continue;
        };
        let cap = capability_of(env, step);
        for action in required_here {
            if !cap.supports_action(&action.name) {
                return Err(SolverDiagnostic::UnassignableAction {
                    action: action.name.to_string(),
                });
            }
            if let Some(idx) = data_info.required_actions.iter().position(|a| a == action) {
                assigned[i].insert(idx);
            }
        }
    }
    Ok(())
}

/// Transform-close-to-data tie-break (§4.5): read flows push actions to
/// the earliest edge able to perform them (closest to the asset); write
/// and copy flows push to the latest edge (closest to the destination).
fn distribute_remaining_actions(
    env: &Environment,
    data_info: &DataInfo,
    chain: &[ChainStep],
    assigned: &mut [HashSet<usize>],
) -> Result<(), SolverDiagnostic> {
    let scan_order: Vec<usize> = match data_info.context.flow {
        FlowType::Read => (0..chain.len()).collect(),
        _ => (0..chain.len()).rev().collect(),
    };

    for (idx, action) in data_info.required_actions.iter().enumerate() {
        if assigned.iter().any(|s| s.contains(&idx)) {
            continue;
        }
        let mut placed = false;
        for &i in &scan_order {
            let cap = capability_of(env, &chain[i]);
            if cap.supports_action(&action.name) {
                assigned[i].insert(idx);
                placed = true;
                break;
            }
        }
        if !placed {
            return Err(SolverDiagnostic::UnassignableAction {
                action: action.name.to_string(),
            });
        }
    }
    Ok(())
}

/// Edge feasibility rule (5): an action delegated to a plugin requires a
/// companion `transform` edge elsewhere in the path that performs it
/// directly.
fn verify_plugin_companions(
    env: &Environment,
    data_info: &DataInfo,
    chain: &[ChainStep],
    assigned: &[HashSet<usize>],
) -> Result<(), SolverDiagnostic> {
    for (i, step) in chain.iter().enumerate() {
        let cap = capability_of(env, step);
        for &idx in &assigned[i] {
            let action = &data_info.required_actions[idx];
            if !cap.action_needs_plugin(&action.name) {
                continue;
            }
            let has_companion = chain.iter().any(|other| {
                other.capability_kind == CapabilityKind::Transform && {
                    let other_cap = capability_of(env, other);
                    other_cap.supported_actions.contains(&action.name)
                }
            });
            if !has_companion {
                return Err(SolverDiagnostic::UnassignableAction {
                    action: action.name.to_string(),
                });
            }
        }
    }
    Ok(())
}
