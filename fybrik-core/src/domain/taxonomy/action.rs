// fybrik-core/src/domain/taxonomy/action.rs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Opaque, governance-assigned action name (e.g. `RedactColumn`, `Deny`).
/// Per spec §4.1 the solver treats actions as unordered items to be
/// assigned to exactly one supporting edge; it never interprets the name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionName(pub String);

impl ActionName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The sentinel name a governance verdict of "deny" is modeled as
    /// (spec §4.3): no module ever supports it, so the solver fails
    /// deterministically with [`crate::domain::error::SolverDiagnostic::UnassignableAction`].
    pub fn deny() -> Self {
        Self("Deny".to_string())
    }

    pub fn is_deny(&self) -> bool {
        self.0 == "Deny"
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `appliedOn` target for an [`Action`], per spec §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppliedOn {
    Dataset,
    Column,
}

/// A concrete governance action to perform, with its arguments and the
/// columns it targets (when `applied_on == Column`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub name: ActionName,
    #[serde(default)]
    pub arguments: HashMap<String, String>,
    pub applied_on: AppliedOn,
    #[serde(default)]
    pub columns: Vec<String>,
}

impl Action {
    pub fn dataset(name: impl Into<ActionName>) -> Self {
        Self {
            name: name.into(),
            arguments: HashMap::new(),
            applied_on: AppliedOn::Dataset,
            columns: vec![],
        }
    }

    pub fn column(name: impl Into<ActionName>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            arguments: HashMap::new(),
            applied_on: AppliedOn::Column,
            columns,
        }
    }
}

impl From<&str> for ActionName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
