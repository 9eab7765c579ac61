// fybrik-core/src/domain/model/infra.rs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A compute cluster eligible to host module instances, per spec §3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub name: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl Cluster {
    pub fn region(&self) -> Option<&str> {
        self.metadata.get("region").map(String::as_str)
    }
}

/// A registered storage target location, per spec §3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageAccount {
    pub name: String,
    pub region: String,
    pub supported_connection: String,
    pub secret_ref: String,
}

/// The kind of entity an [`InfrastructureElement`] attribute is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InfrastructureObject {
    Module,
    Cluster,
    StorageAccount,
    Interaction,
}

/// A single infrastructure attribute, indexed by `(attribute, object,
/// instance)` in [`crate::domain::environment::Environment`], per spec §3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfrastructureElement {
    pub attribute: String,
    pub object: InfrastructureObject,
    pub instance: String,
    pub value: InfrastructureValue,
    #[serde(default)]
    pub units: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InfrastructureValue {
    Numeric(f64),
    Text(String),
    Bool(bool),
}
