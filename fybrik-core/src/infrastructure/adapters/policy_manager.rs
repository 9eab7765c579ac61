// fybrik-core/src/infrastructure/adapters/policy_manager.rs
//
// A static, tag-keyed stand-in for the rego policy engine. Matches a
// request's asset tags against a fixed rule table and returns the
// verdicts for any rule whose tag is present, in table order.

use crate::error::FybrikError;
use crate::ports::policy_manager::{PolicyAction, PolicyManagerPort, PolicyRequest};
use async_trait::async_trait;

pub struct TagRule {
    pub tag: String,
    pub action: PolicyAction,
}

pub struct StaticPolicyManager {
    rules: Vec<TagRule>,
}

impl StaticPolicyManager {
    pub fn new(rules: Vec<TagRule>) -> Self {
        Self { rules }
    }
}

#[async_trait]
impl PolicyManagerPort for StaticPolicyManager {
    async fn get_policy_decisions(&self, request: &PolicyRequest) -> Result<Vec<PolicyAction>, FybrikError> {
        let verdicts = self
            .rules
            .iter()
            .filter(|rule| request.asset_tags.contains_key(&rule.tag))
            .map(|rule| rule.action.clone())
            .collect();
        Ok(verdicts)
    }
}
