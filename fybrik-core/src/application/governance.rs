// fybrik-core/src/application/governance.rs
//
// Component D: the Governance Evaluator, per spec §4.3. Translates a
// `PolicyManagerPort` verdict into the solver-facing `required_actions` /
// `storage_actions_by_location` pair; the rego engine itself stays behind
// the port.

use crate::domain::taxonomy::{Action, ActionName, AppliedOn, FlowType};
use crate::error::FybrikError;
use crate::ports::policy_manager::{PolicyAction, PolicyManagerPort, PolicyRequest};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct GovernanceRequest {
    pub dataset_id: String,
    pub flow: FlowType,
    pub asset_tags: HashMap<String, String>,
    pub app_info: HashMap<String, String>,
    /// The asset's home geography, used to decide which storage regions
    /// require the required actions before landing there (a region equal
    /// to the asset's own geography needs no extra protection).
    pub asset_geography: Option<String>,
    pub candidate_regions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GovernanceOutput {
    pub required_actions: Vec<Action>,
    pub storage_actions_by_location: HashMap<String, Vec<Action>>,
}

#[async_trait]
pub trait GovernanceEvaluator: Send + Sync {
    async fn actions(&self, request: &GovernanceRequest) -> Result<GovernanceOutput, FybrikError>;
}

/// Delegates the verdict to an injected [`PolicyManagerPort`] and
/// translates its response into the solver's action model, per spec §4.3.
pub struct DefaultGovernanceEvaluator {
    policy_manager: Arc<dyn PolicyManagerPort>,
}

impl DefaultGovernanceEvaluator {
    pub fn new(policy_manager: Arc<dyn PolicyManagerPort>) -> Self {
        Self { policy_manager }
    }
}

#[async_trait]
impl GovernanceEvaluator for DefaultGovernanceEvaluator {
    async fn actions(&self, request: &GovernanceRequest) -> Result<GovernanceOutput, FybrikError> {
        let policy_request = PolicyRequest {
            dataset_id: request.dataset_id.clone(),
            operation: request.flow,
            asset_tags: request.asset_tags.clone(),
            app_info: request.app_info.clone(),
        };
        let verdicts = self.policy_manager.get_policy_decisions(&policy_request).await?;
        let required_actions: Vec<Action> = verdicts.into_iter().map(translate).collect();

        // A non-empty storage-actions entry for a region means: data
        // landing there must carry the required actions first. The asset's
        // own home region needs no extra protection; every other
        // candidate region does, per spec §4.3.
        let storage_actions_by_location = if required_actions.is_empty() {
            HashMap::new()
        } else {
            request
                .candidate_regions
                .iter()
                .filter(|region| Some(region.as_str()) != request.asset_geography.as_deref())
                .map(|region| (region.clone(), required_actions.clone()))
                .collect()
        };

        Ok(GovernanceOutput {
            required_actions,
            storage_actions_by_location,
        })
    }
}

fn translate(verdict: PolicyAction) -> Action {
    match verdict {
        PolicyAction::Deny => Action::dataset(ActionName::deny()),
        PolicyAction::RedactColumn(columns) => Action {
            name: ActionName::new("RedactColumn"),
            arguments: HashMap::new(),
            applied_on: AppliedOn::Column,
            columns,
        },
        PolicyAction::RemoveColumn(columns) => Action {
            name: ActionName::new("RemoveColumn"),
            arguments: HashMap::new(),
            applied_on: AppliedOn::Column,
            columns,
        },
    }
}
