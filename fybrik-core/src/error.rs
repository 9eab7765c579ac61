// fybrik-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FybrikError {
    // --- DOMAIN ERRORS (solver diagnostics, invalid model) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (IO, config, adapter failures) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Invalid request: {0}")]
    InvalidSpec(String),
}

impl From<std::io::Error> for FybrikError {
    fn from(err: std::io::Error) -> Self {
        FybrikError::Infrastructure(InfrastructureError::Io(err))
    }
}
