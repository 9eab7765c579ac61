// fybrik-core/src/infrastructure/adapters/storage_agent.rs
//
// An in-memory storage agent: `allocate` hands back a synthetic
// connection keyed by account name, `delete` just forgets it. Stands in
// for a real object-store/db provisioning client.

use crate::domain::model::StorageAccount;
use crate::error::FybrikError;
use crate::ports::storage_agent::{Connection, ProvisionStatus, StorageAgentPort, StorageOptions};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

struct AllocatedEntry {
    connection: Connection,
    persistent: bool,
}

pub struct InMemoryStorageAgent {
    connection_type: String,
    allocated: Mutex<HashMap<String, AllocatedEntry>>,
}

impl InMemoryStorageAgent {
    pub fn new(connection_type: impl Into<String>) -> Self {
        Self {
            connection_type: connection_type.into(),
            allocated: Mutex::new(HashMap::new()),
        }
    }

    pub fn allocated_count(&self) -> usize {
        self.allocated.lock().unwrap_or_else(|p| p.into_inner()).len()
    }
}

#[async_trait]
impl StorageAgentPort for InMemoryStorageAgent {
    async fn allocate(
        &self,
        account: &StorageAccount,
        secret_ref: &str,
        _opts: &StorageOptions,
    ) -> Result<Connection, FybrikError> {
        let connection = Connection {
            connection_type: self.connection_type.clone(),
            properties: [
                ("account".to_string(), account.name.clone()),
                ("secretRef".to_string(), secret_ref.to_string()),
            ]
            .into(),
        };
        self.allocated.lock().unwrap_or_else(|p| p.into_inner()).insert(
            account.name.clone(),
            AllocatedEntry {
                connection: connection.clone(),
                persistent: false,
            },
        );
        Ok(connection)
    }

    async fn delete(&self, connection: &Connection, _opts: &StorageOptions) -> Result<(), FybrikError> {
        let mut allocated = self.allocated.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(account) = connection.properties.get("account") {
            allocated.remove(account);
        }
        Ok(())
    }

    async fn status(&self, connection: &Connection) -> Result<ProvisionStatus, FybrikError> {
        let allocated = self.allocated.lock().unwrap_or_else(|p| p.into_inner());
        let provisioned = connection
            .properties
            .get("account")
            .is_some_and(|account| allocated.contains_key(account));
        Ok(ProvisionStatus { provisioned, err: None })
    }

    async fn set_persistent(&self, connection: &Connection, persistent: bool) -> Result<(), FybrikError> {
        let mut allocated = self.allocated.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(account) = connection.properties.get("account") {
            if let Some(entry) = allocated.get_mut(account) {
                entry.persistent = persistent;
            }
        }
        Ok(())
    }

    fn connection_type(&self) -> &str {
        &self.connection_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> StorageAccount {
        StorageAccount {
            name: "acct1".into(),
            region: "eu".into(),
            supported_connection: "s3".into(),
            secret_ref: "sec".into(),
        }
    }

    #[tokio::test]
    async fn allocate_then_delete_round_trips() {
        let agent = InMemoryStorageAgent::new("s3");
        let opts = StorageOptions {
            app_details: crate::ports::storage_agent::ApplicationDetails {
                namespace: "default".into(),
                name: "app1".into(),
                uuid: "u1".into(),
            },
            dataset_details: Default::default(),
            config_opts: Default::default(),
        };
        let connection = agent.allocate(&account(), "sec", &opts).await.unwrap();
        assert_eq!(agent.allocated_count(), 1);

        agent.delete(&connection, &opts).await.unwrap();
        assert_eq!(agent.allocated_count(), 0);
    }

    #[tokio::test]
    async fn status_reports_provisioned_until_deleted() {
        let agent = InMemoryStorageAgent::new("s3");
        let opts = StorageOptions {
            app_details: crate::ports::storage_agent::ApplicationDetails {
                namespace: "default".into(),
                name: "app1".into(),
                uuid: "u1".into(),
            },
            dataset_details: Default::default(),
            config_opts: Default::default(),
        };
        let connection = agent.allocate(&account(), "sec", &opts).await.unwrap();
        assert!(agent.status(&connection).await.unwrap().provisioned);

        agent.delete(&connection, &opts).await.unwrap();
        assert!(!agent.status(&connection).await.unwrap().provisioned);
    }

    #[tokio::test]
    async fn set_persistent_is_tracked_per_connection() {
        let agent = InMemoryStorageAgent::new("s3");
        let opts = StorageOptions {
            app_details: crate::ports::storage_agent::ApplicationDetails {
                namespace: "default".into(),
                name: "app1".into(),
                uuid: "u1".into(),
            },
            dataset_details: Default::default(),
            config_opts: Default::default(),
        };
        let connection = agent.allocate(&account(), "sec", &opts).await.unwrap();
        agent.set_persistent(&connection, true).await.unwrap();

        // Persistence doesn't change what `status` reports; it's consulted
        // by the provisioner's stale-release pass, not by this agent.
        assert!(agent.status(&connection).await.unwrap().provisioned);
    }
}
