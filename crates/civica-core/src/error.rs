//! Error types for the Civica system.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CivicaError {
    /// No authenticated acting user was supplied.
    #[error("Unauthorized: no authenticated user")]
    Unauthorized,

    /// The acting user has not been assigned to an organization yet.
    #[error("User is not assigned to an organization")]
    UnassignedOrganization,

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("User {user_id} is already assigned to another organization")]
    AlreadyAssigned { user_id: Uuid },

    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CivicaError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// True for the errors that callers surface as "access denied".
    pub fn is_access_denied(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized | Self::UnassignedOrganization | Self::Forbidden { .. }
        )
    }
}

pub type CivicaResult<T> = Result<T, CivicaError>;
