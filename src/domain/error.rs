//! Domain errors

use thiserror::Error;

/// Domain-level error types
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    /// Entity lookup failed
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    /// Unique constraint or business rule conflict
    #[error("{0}")]
    Conflict(String),
    /// Input failed validation
    #[error("{0}")]
    Validation(String),
    /// Credentials rejected
    #[error("{0}")]
    Unauthorized(String),
    /// Action not permitted for this caller
    #[error("{0}")]
    Forbidden(String),
    /// Storage/database error
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
