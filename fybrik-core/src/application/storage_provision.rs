// fybrik-core/src/application/storage_provision.rs
//
// Component I's consumer: orchestrates allocate/release calls around the
// solver↔generator boundary, per spec §4.7 ("Storage provisioning occurs
// between solver and generator").

use crate::domain::model::Solution;
use crate::error::FybrikError;
use crate::ports::storage_agent::{Connection, StorageAgentRegistry, StorageOptions};
use crate::ports::ApplicationDetails;

/// One allocated bucket/account this request owns. Per spec §5, ownership
/// is encoded via a label, not a pointer; per §9's cataloging Open
/// Question, a persistent entry is never reverted.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionedStorageEntry {
    pub dataset_id: String,
    pub account: String,
    pub connection: Connection,
    pub owner_label: String,
    pub persistent: bool,
}

/// Everything [`StorageProvisioner::reconcile`] needs beyond the solution
/// and the previously-provisioned entries, bundled to keep the call site
/// readable.
pub struct ProvisionContext<'a> {
    pub owner_label: &'a str,
    pub dataset_id: &'a str,
    pub app_details: &'a ApplicationDetails,
    pub accounts: &'a [crate::domain::model::StorageAccount],
    /// Maps a `StorageAccount.supported_connection` to the connection type
    /// a registered agent advertises for it.
    pub connection_type_for: &'a dyn Fn(&str) -> String,
    pub secret_ref_for: &'a dyn Fn(&str) -> String,
}

pub struct StorageProvisioner<'a> {
    registry: &'a StorageAgentRegistry,
}

impl<'a> StorageProvisioner<'a> {
    pub fn new(registry: &'a StorageAgentRegistry) -> Self {
        Self { registry }
    }

    /// Allocates storage for every account-bearing edge in `solution` not
    /// already covered by `previous`, and releases `previous` entries the
    /// new solution no longer references, unless marked persistent.
    pub async fn reconcile(
        &self,
        solution: &Solution,
        previous: &[ProvisionedStorageEntry],
        ctx: &ProvisionContext<'_>,
    ) -> Result<Vec<ProvisionedStorageEntry>, FybrikError> {
        let wanted: Vec<&str> = solution
            .edges
            .iter()
            .filter_map(|e| e.storage_account.as_deref())
            .collect();

        for stale in previous {
            if stale.persistent || wanted.contains(&stale.account.as_str()) {
                continue;
            }
            let agent = self.registry.get(&stale.connection.connection_type)?;
            let opts = StorageOptions {
                app_details: ctx.app_details.clone(),
                dataset_details: Default::default(),
                config_opts: Default::default(),
            };
            agent.delete(&stale.connection, &opts).await?;
        }

        let mut result = Vec::new();
        for account_name in wanted {
            if let Some(existing) = previous.iter().find(|p| p.account == account_name) {
                result.push(existing.clone());
                continue;
            }
            let account = ctx
                .accounts
                .iter()
                .find(|a| a.name == account_name)
                .ok_or_else(|| {
                    crate::infrastructure::error::InfrastructureError::Config(format!(
                        "unknown storage account '{account_name}' in solution"
                    ))
                })?;
            let connection_type = (ctx.connection_type_for)(&account.supported_connection);
            let agent = self.registry.get(&connection_type)?;
            let opts = StorageOptions {
                app_details: ctx.app_details.clone(),
                dataset_details: Default::default(),
                config_opts: Default::default(),
            };
            let secret_ref = (ctx.secret_ref_for)(account_name);
            let connection = agent.allocate(account, &secret_ref, &opts).await?;
            result.push(ProvisionedStorageEntry {
                dataset_id: ctx.dataset_id.to_string(),
                account: account_name.to_string(),
                connection,
                owner_label: ctx.owner_label.to_string(),
                persistent: false,
            });
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::StorageAccount;
    use crate::ports::storage_agent::StorageAgentPort;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;

    struct RecordingAgent;

    #[async_trait]
    impl StorageAgentPort for RecordingAgent {
        async fn allocate(
            &self,
            account: &StorageAccount,
            _secret_ref: &str,
            _opts: &StorageOptions,
        ) -> Result<Connection, FybrikError> {
            Ok(Connection {
                connection_type: "s3".into(),
                properties: [("bucket".to_string(), account.name.clone())].into(),
            })
        }

        async fn delete(&self, _connection: &Connection, _opts: &StorageOptions) -> Result<(), FybrikError> {
            Ok(())
        }

        async fn status(
            &self,
            _connection: &Connection,
        ) -> Result<crate::ports::storage_agent::ProvisionStatus, FybrikError> {
            Ok(crate::ports::storage_agent::ProvisionStatus { provisioned: true, err: None })
        }

        async fn set_persistent(&self, _connection: &Connection, _persistent: bool) -> Result<(), FybrikError> {
            Ok(())
        }

        fn connection_type(&self) -> &str {
            "s3"
        }
    }

    fn account(name: &str) -> StorageAccount {
        StorageAccount {
            name: name.to_string(),
            region: "eu".into(),
            supported_connection: "s3".into(),
            secret_ref: "sec".into(),
        }
    }

    fn app_details() -> ApplicationDetails {
        ApplicationDetails {
            namespace: "default".into(),
            name: "app1".into(),
            uuid: "uuid-1".into(),
        }
    }

    #[tokio::test]
    async fn allocates_new_accounts_and_releases_stale_ones() {
        use crate::domain::model::ResolvedEdge;
        use crate::domain::taxonomy::CapabilityKind;

        let mut registry = StorageAgentRegistry::new();
        registry.register(Arc::new(RecordingAgent));

        let solution = Solution {
            edges: vec![ResolvedEdge {
                module: "copy-mod".into(),
                capability_index: 0,
                capability_kind: CapabilityKind::Copy,
                cluster: "eu-1".into(),
                storage_account: Some("acct2".into()),
                source_interface: None,
                sink_interface: None,
                actions: vec![],
            }],
        };
        let previous = vec![ProvisionedStorageEntry {
            dataset_id: "ds1".into(),
            account: "acct1".into(),
            connection: Connection {
                connection_type: "s3".into(),
                properties: HashMap::new(),
            },
            owner_label: "default.app1".into(),
            persistent: false,
        }];
        let provisioner = StorageProvisioner::new(&registry);
        let accounts = [account("acct2")];
        let ctx = ProvisionContext {
            owner_label: "default.app1",
            dataset_id: "ds1",
            app_details: &app_details(),
            accounts: &accounts,
            connection_type_for: &|_| "s3".to_string(),
            secret_ref_for: &|_| "sec".to_string(),
        };
        let result = provisioner.reconcile(&solution, &previous, &ctx).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].account, "acct2");
    }

    #[tokio::test]
    async fn persistent_entries_are_never_released() {
        let mut registry = StorageAgentRegistry::new();
        registry.register(Arc::new(RecordingAgent));

        let solution = Solution { edges: vec![] };
        let previous = vec![ProvisionedStorageEntry {
            dataset_id: "ds1".into(),
            account: "acct1".into(),
            connection: Connection {
                connection_type: "s3".into(),
                properties: HashMap::new(),
            },
            owner_label: "default.app1".into(),
            persistent: true,
        }];
        let provisioner = StorageProvisioner::new(&registry);
        let ctx = ProvisionContext {
            owner_label: "default.app1",
            dataset_id: "ds1",
            app_details: &app_details(),
            accounts: &[],
            connection_type_for: &|_| "s3".to_string(),
            secret_ref_for: &|_| "sec".to_string(),
        };
        let result = provisioner.reconcile(&solution, &previous, &ctx).await.unwrap();

        // not re-allocated (solution wants nothing) and not released (persistent)
        assert!(result.is_empty());
    }
}
