//! Database-specific error types and conversions.

use civica_core::error::CivicaError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Unique constraint violated on {entity}")]
    Duplicate { entity: String },

    #[error("Failed to decode {entity} row: {message}")]
    Decode { entity: String, message: String },

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl DbError {
    /// Classify a failed statement, recognising unique index violations.
    pub(crate) fn from_statement(entity: &str, err: impl std::fmt::Display) -> Self {
        let message = err.to_string();
        if message.contains("already contains") {
            DbError::Duplicate {
                entity: entity.to_string(),
            }
        } else {
            DbError::Query(message)
        }
    }

    pub(crate) fn decode(entity: &str, message: impl std::fmt::Display) -> Self {
        DbError::Decode {
            entity: entity.to_string(),
            message: message.to_string(),
        }
    }
}

impl From<DbError> for CivicaError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => CivicaError::NotFound { entity, id },
            DbError::Duplicate { entity } => CivicaError::AlreadyExists { entity },
            other => CivicaError::Database(other.to_string()),
        }
    }
}
