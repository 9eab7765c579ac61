// fybrik-core/src/infrastructure/config/policy_manager.rs
//
// Connector configuration for the catalog and policy-manager hosts the
// reconciler talks to, per spec §6. Loaded from YAML with env-var
// overrides, mirroring the teacher's `ConnectionProfile`/`load_connections`
// satellite pattern.

use crate::infrastructure::error::InfrastructureError;
use serde::Deserialize;
use std::time::Duration;
use validator::Validate;

/// One external connector's name + URL, shared shape for both the
/// catalog and the policy-manager hosts.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ConnectorConfig {
    #[validate(length(min = 1))]
    pub provider_name: String,
    #[validate(url)]
    pub connector_url: String,
}

/// The reconciler host's full external-connection configuration, per
/// spec §6's env-var list.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct HostConfig {
    #[validate(nested)]
    pub catalog: ConnectorConfig,
    #[validate(nested)]
    pub policy_manager: ConnectorConfig,
    pub multicluster_group: String,
    #[serde(default = "default_connection_timeout_secs")]
    pub connection_timeout_secs: u64,
    pub data_dir: String,
    pub system_namespace: String,
    pub application_namespace: String,
    #[serde(default = "default_client_qps")]
    pub client_qps: f32,
    #[serde(default = "default_client_burst")]
    pub client_burst: u32,
    #[serde(default)]
    pub enable_webhooks: bool,
}

fn default_connection_timeout_secs() -> u64 {
    30
}

fn default_client_qps() -> f32 {
    20.0
}

fn default_client_burst() -> u32 {
    30
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            catalog: ConnectorConfig {
                provider_name: "katalog".to_string(),
                connector_url: "http://localhost:8080".to_string(),
            },
            policy_manager: ConnectorConfig {
                provider_name: "opa".to_string(),
                connector_url: "http://localhost:8181".to_string(),
            },
            multicluster_group: "mesh-for-data.io".to_string(),
            connection_timeout_secs: default_connection_timeout_secs(),
            data_dir: "/etc/fybrik/data".to_string(),
            system_namespace: "fybrik-system".to_string(),
            application_namespace: "fybrik-app".to_string(),
            client_qps: default_client_qps(),
            client_burst: default_client_burst(),
            enable_webhooks: false,
        }
    }
}

impl HostConfig {
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }

    /// Builds a `HostConfig` from built-in defaults with `§6`'s env vars
    /// layered over them, for a host process with no on-disk base file.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Layers `CATALOG_PROVIDER_NAME`, `CATALOG_CONNECTOR_URL`,
    /// `MAIN_POLICY_MANAGER_NAME`, `MAIN_POLICY_MANAGER_CONNECTOR_URL`,
    /// `MULTICLUSTER_GROUP`, `CONNECTION_TIMEOUT`, `DATA_DIR`,
    /// `SYSTEM_NAMESPACE`, `APPLICATION_NAMESPACE`, `CLIENT_QPS`,
    /// `CLIENT_BURST`, `ENABLE_WEBHOOKS` over whatever a base file
    /// provided, per spec §6.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("CATALOG_PROVIDER_NAME") {
            self.catalog.provider_name = v;
        }
        if let Ok(v) = std::env::var("CATALOG_CONNECTOR_URL") {
            self.catalog.connector_url = v;
        }
        if let Ok(v) = std::env::var("MAIN_POLICY_MANAGER_NAME") {
            self.policy_manager.provider_name = v;
        }
        if let Ok(v) = std::env::var("MAIN_POLICY_MANAGER_CONNECTOR_URL") {
            self.policy_manager.connector_url = v;
        }
        if let Ok(v) = std::env::var("MULTICLUSTER_GROUP") {
            self.multicluster_group = v;
        }
        if let Some(v) = std::env::var("CONNECTION_TIMEOUT").ok().and_then(|s| s.parse().ok()) {
            self.connection_timeout_secs = v;
        }
        if let Ok(v) = std::env::var("DATA_DIR") {
            self.data_dir = v;
        }
        if let Ok(v) = std::env::var("SYSTEM_NAMESPACE") {
            self.system_namespace = v;
        }
        if let Ok(v) = std::env::var("APPLICATION_NAMESPACE") {
            self.application_namespace = v;
        }
        if let Some(v) = std::env::var("CLIENT_QPS").ok().and_then(|s| s.parse().ok()) {
            self.client_qps = v;
        }
        if let Some(v) = std::env::var("CLIENT_BURST").ok().and_then(|s| s.parse().ok()) {
            self.client_burst = v;
        }
        if let Ok(v) = std::env::var("ENABLE_WEBHOOKS") {
            self.enable_webhooks = v == "true" || v == "1";
        }
    }
}

pub fn load_host_config(content: &str) -> Result<HostConfig, InfrastructureError> {
    let mut config: HostConfig = serde_yaml::from_str(content)?;
    config.apply_env_overrides();
    config
        .validate()
        .map_err(|e| InfrastructureError::Config(e.to_string()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_yaml() -> &'static str {
        r#"
catalog:
  provider_name: katalog
  connector_url: http://catalog.svc:8080
policy_manager:
  provider_name: opa
  connector_url: http://opa.svc:8181
multicluster_group: mesh-for-data.io
data_dir: /etc/fybrik/data
system_namespace: fybrik-system
application_namespace: fybrik-app
"#
    }

    #[test]
    fn loads_defaults_for_omitted_fields() {
        let config = load_host_config(base_yaml()).unwrap();
        assert_eq!(config.connection_timeout_secs, 30);
        assert_eq!(config.client_qps, 20.0);
        assert!(!config.enable_webhooks);
    }

    #[test]
    fn env_override_wins_over_file() {
        std::env::set_var("MULTICLUSTER_GROUP", "overridden.io");
        let config = load_host_config(base_yaml()).unwrap();
        std::env::remove_var("MULTICLUSTER_GROUP");
        assert_eq!(config.multicluster_group, "overridden.io");
    }

    #[test]
    fn rejects_non_url_connector() {
        let yaml = base_yaml().replace("http://catalog.svc:8080", "not-a-url");
        assert!(load_host_config(&yaml).is_err());
    }
}
