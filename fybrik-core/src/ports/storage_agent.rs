// fybrik-core/src/ports/storage_agent.rs
//
// Component I: storage provisioning agents, mirrored from
// `pkg/storage/registrator/agent/agent.go`'s `AgentInterface`. A registry
// keyed by connection type provides the dynamic dispatch called out in
// spec §9 ("Dynamic dispatch for storage agents").

use crate::domain::model::StorageAccount;
use crate::error::FybrikError;
use crate::infrastructure::error::InfrastructureError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Identifies the owning application, for owner-labeling provisioned
/// storage (spec §5 "Shared resources").
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationDetails {
    pub namespace: String,
    pub name: String,
    pub uuid: String,
}

/// The new asset's name, for write-new-data-set flows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DatasetDetails {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfigOptions {
    pub delete_empty_folder: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorageOptions {
    pub app_details: ApplicationDetails,
    pub dataset_details: DatasetDetails,
    pub config_opts: ConfigOptions,
}

/// The resulting physical connection, keyed by the same connection type
/// the allocating agent declares.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub connection_type: String,
    pub properties: HashMap<String, String>,
}

/// The agent's observed provisioning state for one connection, per spec
/// §4.7's "only once all allocations are observed Provisioned" gate.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProvisionStatus {
    pub provisioned: bool,
    pub err: Option<String>,
}

#[async_trait]
pub trait StorageAgentPort: Send + Sync {
    async fn allocate(
        &self,
        account: &StorageAccount,
        secret_ref: &str,
        opts: &StorageOptions,
    ) -> Result<Connection, FybrikError>;

    async fn delete(&self, connection: &Connection, opts: &StorageOptions) -> Result<(), FybrikError>;

    /// Level-triggered provisioning poll, mirroring the generator's own
    /// readiness gate on the applier (spec §4.7/§4.8).
    async fn status(&self, connection: &Connection) -> Result<ProvisionStatus, FybrikError>;

    /// Marks (or unmarks) a connection as surviving request deletion, per
    /// `Provision.SetPersistent` (`original_source/manager/controllers/app/m4dapplication_controller.go:159`).
    async fn set_persistent(&self, connection: &Connection, persistent: bool) -> Result<(), FybrikError>;

    fn connection_type(&self) -> &str;
}

/// Dispatches to the agent registered for a connection type, per spec §4.8.
#[derive(Default, Clone)]
pub struct StorageAgentRegistry {
    agents: HashMap<String, Arc<dyn StorageAgentPort>>,
}

impl StorageAgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, agent: Arc<dyn StorageAgentPort>) {
        self.agents.insert(agent.connection_type().to_string(), agent);
    }

    pub fn get(&self, connection_type: &str) -> Result<Arc<dyn StorageAgentPort>, FybrikError> {
        self.agents
            .get(connection_type)
            .cloned()
            .ok_or_else(|| InfrastructureError::NoStorageAgentFor(connection_type.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullAgent(&'static str);

    #[async_trait]
    impl StorageAgentPort for NullAgent {
        async fn allocate(
            &self,
            _account: &StorageAccount,
            _secret_ref: &str,
            _opts: &StorageOptions,
        ) -> Result<Connection, FybrikError> {
            Ok(Connection {
                connection_type: self.0.to_string(),
                properties: HashMap::new(),
            })
        }

        async fn delete(&self, _connection: &Connection, _opts: &StorageOptions) -> Result<(), FybrikError> {
            Ok(())
        }

        async fn status(&self, _connection: &Connection) -> Result<ProvisionStatus, FybrikError> {
            Ok(ProvisionStatus { provisioned: true, err: None })
        }

        async fn set_persistent(&self, _connection: &Connection, _persistent: bool) -> Result<(), FybrikError> {
            Ok(())
        }

        fn connection_type(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn registry_dispatches_by_connection_type() {
        let mut registry = StorageAgentRegistry::new();
        registry.register(Arc::new(NullAgent("s3")));
        assert!(registry.get("s3").is_ok());
        assert!(registry.get("jdbc-db2").is_err());
    }
}
