// fybrik-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

/// Failures from the adapters plugged into the `ports` traits and from
/// config loading. Distinct from [`crate::domain::error::DomainError`]:
/// these are collaborator/IO failures, not violations of the solver's own
/// invariants.
#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    #[error("I/O error: {0}")]
    #[diagnostic(code(fybrik::infra::io))]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    #[diagnostic(code(fybrik::infra::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("Project configuration not found at '{0}'")]
    #[diagnostic(code(fybrik::infra::config_missing))]
    ConfigNotFound(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(fybrik::infra::config))]
    Config(String),

    #[error("Catalog error: {0}")]
    #[diagnostic(code(fybrik::infra::catalog))]
    Catalog(String),

    #[error("Credentials error: {0}")]
    #[diagnostic(code(fybrik::infra::credentials))]
    Credentials(String),

    #[error("Policy manager error: {0}")]
    #[diagnostic(code(fybrik::infra::policy_manager))]
    PolicyManager(String),

    #[error("Storage agent error for connection type '{connection_type}': {message}")]
    #[diagnostic(code(fybrik::infra::storage_agent))]
    StorageAgent {
        connection_type: String,
        message: String,
    },

    #[error("No storage agent registered for connection type '{0}'")]
    #[diagnostic(code(fybrik::infra::storage_agent_missing))]
    NoStorageAgentFor(String),

    #[error("Applier error: {0}")]
    #[diagnostic(code(fybrik::infra::applier))]
    Applier(String),

    #[error("Transient error, safe to retry: {0}")]
    #[diagnostic(code(fybrik::infra::transient))]
    Transient(String),
}

impl InfrastructureError {
    /// Per spec §7's error taxonomy: transient failures are retried with
    /// backoff rather than surfaced as a terminal condition.
    pub fn is_transient(&self) -> bool {
        matches!(self, InfrastructureError::Transient(_))
    }
}
