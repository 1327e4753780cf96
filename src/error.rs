//! # Error Handling
//!
//! This module provides the error taxonomy shared by the repository,
//! service and console layers: validation failures, missing records,
//! uniqueness conflicts reported by the store, and store failures.

use sea_orm::{DbErr, RuntimeErr, SqlErr};
use thiserror::Error;

/// Errors produced by the data access layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A unique constraint (e.g. channel name) rejected the write
    #[error("unique constraint violated: {0}")]
    Conflict(String),
    /// Any other failure reported by the store or the pool
    #[error("database error: {0}")]
    Database(#[source] DbErr),
}

impl RepositoryError {
    /// Classify a store error, separating unique-constraint violations
    /// from everything else.
    pub fn database_error(error: DbErr) -> Self {
        if is_unique_violation(&error) {
            tracing::debug!(?error, "Unique constraint violation detected");
            return Self::Conflict(error.to_string());
        }
        Self::Database(error)
    }
}

impl From<DbErr> for RepositoryError {
    fn from(error: DbErr) -> Self {
        Self::database_error(error)
    }
}

fn is_unique_violation(error: &DbErr) -> bool {
    const PG_UNIQUE: &str = "23505";
    const MYSQL_DUPLICATE_CODES: &[&str] = &["1022", "1062", "1169", "1586", "23000"];
    const SQLITE_DUPLICATE_CODES: &[&str] = &["1555", "2067"];

    if matches!(error.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        return true;
    }

    let runtime_err = match error {
        DbErr::Query(RuntimeErr::SqlxError(sqlx_err))
        | DbErr::Exec(RuntimeErr::SqlxError(sqlx_err)) => sqlx_err,
        _ => return false,
    };

    let Some(db_error) = runtime_err.as_database_error() else {
        return false;
    };

    if db_error.is_unique_violation() {
        return true;
    }

    if let Some(code) = db_error.code() {
        let code_str = code.as_ref();
        if code_str == PG_UNIQUE
            || MYSQL_DUPLICATE_CODES.contains(&code_str)
            || SQLITE_DUPLICATE_CODES.contains(&code_str)
        {
            return true;
        }
    }

    false
}

/// Coarse error categories reported to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Database,
}

impl ErrorKind {
    /// Stable SCREAMING_SNAKE_CASE code for this kind
    pub fn error_code(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION_FAILED",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::Database => "DATABASE_ERROR",
        }
    }
}

/// Errors produced by the orchestration layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Bad input shape or a business-rule violation; nothing was written
    #[error("{0}")]
    Validation(String),
    /// A referenced record does not exist; nothing was written
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },
    /// The store rejected a write as a duplicate
    #[error("{0}")]
    Conflict(String),
    /// Store connectivity or statement failure
    #[error("database error: {0}")]
    Database(#[source] DbErr),
}

impl ServiceError {
    /// Build a validation error from any message
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Build a not-found error for the given entity label and id
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Validation(_) => ErrorKind::Validation,
            ServiceError::NotFound { .. } => ErrorKind::NotFound,
            ServiceError::Conflict(_) => ErrorKind::Conflict,
            ServiceError::Database(_) => ErrorKind::Database,
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::Conflict(message) => ServiceError::Conflict(message),
            RepositoryError::Database(source) => {
                tracing::error!(error = ?source, "Database error");
                ServiceError::Database(source)
            }
        }
    }
}

impl From<DbErr> for ServiceError {
    fn from(error: DbErr) -> Self {
        RepositoryError::database_error(error).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_not_found_is_not_a_conflict() {
        let err = RepositoryError::database_error(DbErr::RecordNotFound("campaign".into()));
        assert!(matches!(err, RepositoryError::Database(_)));
    }

    #[test]
    fn repository_conflict_maps_to_conflict_kind() {
        let err: ServiceError = RepositoryError::Conflict("dup".into()).into();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.kind().error_code(), "CONFLICT");
    }

    #[test]
    fn not_found_message_names_entity_and_id() {
        let err = ServiceError::not_found("campaign", 42);
        assert_eq!(err.to_string(), "campaign 42 not found");
        assert_eq!(err.kind().error_code(), "NOT_FOUND");
    }

    #[test]
    fn connection_errors_are_database_kind() {
        let err: ServiceError = DbErr::Conn(RuntimeErr::Internal("refused".into())).into();
        assert_eq!(err.kind(), ErrorKind::Database);
    }
}
