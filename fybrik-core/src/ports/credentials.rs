// fybrik-core/src/ports/credentials.rs
//
// Component B: the credentials façade. Out of scope as an implementation
// (no production vault client lives here), in scope as a contract the
// storage-provisioning use case calls to resolve an account's `secretRef`.

use crate::error::FybrikError;
use async_trait::async_trait;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub secret_ref: String,
    pub properties: HashMap<String, String>,
}

#[async_trait]
pub trait CredentialsPort: Send + Sync {
    async fn get_credentials(&self, secret_ref: &str) -> Result<Credentials, FybrikError>;
}
