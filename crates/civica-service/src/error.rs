//! Service error types.

use civica_core::error::CivicaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("organization administrator privileges required")]
    AdminRequired,

    #[error("update contains no changes")]
    EmptyUpdate,

    #[error("invalid slug '{0}': use lowercase letters, digits and hyphens")]
    InvalidSlug(String),

    #[error("batch size must be greater than zero")]
    InvalidBatchSize,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<ServiceError> for CivicaError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::AdminRequired => CivicaError::Forbidden {
                reason: err.to_string(),
            },
            ServiceError::EmptyUpdate
            | ServiceError::InvalidSlug(_)
            | ServiceError::InvalidBatchSize => CivicaError::Validation {
                message: err.to_string(),
            },
            ServiceError::Serialization(e) => CivicaError::Internal(e.to_string()),
        }
    }
}
