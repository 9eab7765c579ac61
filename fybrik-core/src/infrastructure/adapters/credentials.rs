// fybrik-core/src/infrastructure/adapters/credentials.rs

use crate::error::FybrikError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::credentials::{Credentials, CredentialsPort};
use async_trait::async_trait;
use std::collections::HashMap;

/// Resolves a `secretRef` against a fixed table, standing in for a vault client.
pub struct StaticCredentials {
    table: HashMap<String, Credentials>,
}

impl StaticCredentials {
    pub fn new(table: HashMap<String, Credentials>) -> Self {
        Self { table }
    }
}

#[async_trait]
impl CredentialsPort for StaticCredentials {
    async fn get_credentials(&self, secret_ref: &str) -> Result<Credentials, FybrikError> {
        self.table
            .get(secret_ref)
            .cloned()
            .ok_or_else(|| InfrastructureError::Credentials(format!("unknown secretRef '{secret_ref}'")).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_secret_ref_is_an_error() {
        let creds = StaticCredentials::new(HashMap::new());
        assert!(creds.get_credentials("missing").await.is_err());
    }

    #[tokio::test]
    async fn known_secret_ref_resolves() {
        let mut table = HashMap::new();
        table.insert(
            "vault://sec1".to_string(),
            Credentials {
                secret_ref: "vault://sec1".to_string(),
                properties: HashMap::new(),
            },
        );
        let creds = StaticCredentials::new(table);
        assert!(creds.get_credentials("vault://sec1").await.is_ok());
    }
}
