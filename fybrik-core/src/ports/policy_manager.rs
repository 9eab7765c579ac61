// fybrik-core/src/ports/policy_manager.rs
//
// Component B/D's collaborator: the governance policy engine, per spec §6
// ("Policy-manager interface"). The rego evaluator itself is out of scope;
// this is the contract `application::governance::DefaultGovernanceEvaluator`
// calls and translates into solver-facing Actions.

use crate::error::FybrikError;
use async_trait::async_trait;
use std::collections::HashMap;

/// One verdict returned by the policy manager, per spec §6. `Deny` and
/// column-scoped redact/remove are the only variants the source defines;
/// an empty response is "allow as-is".
#[derive(Debug, Clone, PartialEq)]
pub enum PolicyAction {
    Deny,
    RedactColumn(Vec<String>),
    RemoveColumn(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolicyRequest {
    pub dataset_id: String,
    pub operation: crate::domain::taxonomy::FlowType,
    pub asset_tags: HashMap<String, String>,
    pub app_info: HashMap<String, String>,
}

#[async_trait]
pub trait PolicyManagerPort: Send + Sync {
    async fn get_policy_decisions(
        &self,
        request: &PolicyRequest,
    ) -> Result<Vec<PolicyAction>, FybrikError>;
}
