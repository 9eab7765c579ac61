// fybrik-core/src/domain/model/decision.rs
//
// Config-Policy Evaluator (component C) output types, per spec §3/§4.2.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-capability deploy intent. `Unknown` means "solver's discretion" —
/// per spec §9's Open Question, it carries no additional heuristic meaning
/// beyond "no constraint"; any preference is expressed only through the
/// solver's tie-break ordering (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployStatus {
    True,
    False,
    Unknown,
}

/// A scalar attribute value as exposed on an entity's property-path lookup
/// table (cluster/module/storage-account fields plus overlaid
/// infrastructure attributes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Number(f64),
    Text(String),
    Bool(bool),
}

/// The allowed-values side of a [`Predicate`]: either an explicit set of
/// values or a numeric range (either bound may be open).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PredicateValue {
    OneOf(Vec<String>),
    Range { min: Option<f64>, max: Option<f64> },
    Bool(bool),
}

/// A single predicate on a property path, per spec §4.2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub path: String,
    pub value: PredicateValue,
}

impl Predicate {
    pub fn new(path: impl Into<String>, value: PredicateValue) -> Self {
        Self {
            path: path.into(),
            value,
        }
    }

    /// Evaluate against an entity's attribute table. A missing path fails
    /// the predicate (fail-closed): an admin restriction that names an
    /// attribute the candidate doesn't carry should exclude it, not pass it.
    pub fn is_satisfied_by(&self, attributes: &HashMap<String, AttributeValue>) -> bool {
        match attributes.get(&self.path) {
            None => false,
            Some(actual) => match (&self.value, actual) {
                (PredicateValue::OneOf(allowed), AttributeValue::Text(t)) => {
                    allowed.iter().any(|a| a == t)
                }
                (PredicateValue::OneOf(allowed), AttributeValue::Number(n)) => {
                    allowed.iter().any(|a| a.parse::<f64>().map(|v| v == *n).unwrap_or(false))
                }
                (PredicateValue::Range { min, max }, AttributeValue::Number(n)) => {
                    min.map_or(true, |m| *n >= m) && max.map_or(true, |m| *n <= m)
                }
                (PredicateValue::Bool(expected), AttributeValue::Bool(actual)) => {
                    expected == actual
                }
                _ => false,
            },
        }
    }
}

/// Conjunctive restriction sets for each candidate kind an edge picks,
/// per spec §4.2/§4.5.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Restrictions {
    #[serde(default)]
    pub clusters: Vec<Predicate>,
    #[serde(default)]
    pub modules: Vec<Predicate>,
    #[serde(default)]
    pub storage_accounts: Vec<Predicate>,
    #[serde(default)]
    pub scope: Vec<Predicate>,
}

impl Restrictions {
    pub fn clusters_satisfied_by(&self, attrs: &HashMap<String, AttributeValue>) -> bool {
        self.clusters.iter().all(|p| p.is_satisfied_by(attrs))
    }

    pub fn modules_satisfied_by(&self, attrs: &HashMap<String, AttributeValue>) -> bool {
        self.modules.iter().all(|p| p.is_satisfied_by(attrs))
    }

    pub fn storage_accounts_satisfied_by(&self, attrs: &HashMap<String, AttributeValue>) -> bool {
        self.storage_accounts.iter().all(|p| p.is_satisfied_by(attrs))
    }

    pub fn scope_satisfied_by(&self, attrs: &HashMap<String, AttributeValue>) -> bool {
        self.scope.iter().all(|p| p.is_satisfied_by(attrs))
    }
}

/// Policy decision for one capability kind, per spec §3 Decision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub deploy: Option<DeployStatus>,
    #[serde(default)]
    pub restrictions: Restrictions,
}

impl Decision {
    pub fn unconstrained() -> Self {
        Self {
            deploy: Some(DeployStatus::Unknown),
            restrictions: Restrictions::default(),
        }
    }

    pub fn must_not_deploy(&self) -> bool {
        matches!(self.deploy, Some(DeployStatus::False))
    }

    pub fn must_deploy(&self) -> bool {
        matches!(self.deploy, Some(DeployStatus::True))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, AttributeValue)]) -> HashMap<String, AttributeValue> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn one_of_predicate_matches_text() {
        let p = Predicate::new(
            "region",
            PredicateValue::OneOf(vec!["eu".into(), "us".into()]),
        );
        assert!(p.is_satisfied_by(&attrs(&[("region", AttributeValue::Text("eu".into()))])));
        assert!(!p.is_satisfied_by(&attrs(&[("region", AttributeValue::Text("ap".into()))])));
    }

    #[test]
    fn range_predicate_bounds_are_inclusive() {
        let p = Predicate::new(
            "cost",
            PredicateValue::Range {
                min: None,
                max: Some(15.0),
            },
        );
        assert!(p.is_satisfied_by(&attrs(&[("cost", AttributeValue::Number(15.0))])));
        assert!(!p.is_satisfied_by(&attrs(&[("cost", AttributeValue::Number(15.1))])));
    }

    #[test]
    fn missing_path_fails_closed() {
        let p = Predicate::new("cost", PredicateValue::Range { min: None, max: Some(15.0) });
        assert!(!p.is_satisfied_by(&HashMap::new()));
    }

    #[test]
    fn restrictions_are_conjunctive() {
        let r = Restrictions {
            clusters: vec![
                Predicate::new("region", PredicateValue::OneOf(vec!["eu".into()])),
                Predicate::new("zone", PredicateValue::OneOf(vec!["a".into()])),
            ],
            ..Default::default()
        };
        let ok = attrs(&[
            ("region", AttributeValue::Text("eu".into())),
            ("zone", AttributeValue::Text("a".into())),
        ]);
        assert!(r.clusters_satisfied_by(&ok));

        let bad = attrs(&[
            ("region", AttributeValue::Text("eu".into())),
            ("zone", AttributeValue::Text("b".into())),
        ]);
        assert!(!r.clusters_satisfied_by(&bad));
    }
}
