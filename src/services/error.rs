//! Error types for the service layer.

use crate::db::repository::RepositoryError;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors raised by the business-logic layer.
///
/// Each variant corresponds to one outcome class the HTTP layer maps to a
/// status code; repository failures that are not domain outcomes pass through
/// as [`ServiceError::Repository`].
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Referenced listing, booking, or profile does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The acting user lacks permission for the requested operation.
    #[error("{0}")]
    Forbidden(String),

    /// The requested date range overlaps an existing blocking booking.
    #[error("{0}")]
    Conflict(String),

    /// A status change was requested from an incompatible source state.
    #[error("{0}")]
    InvalidTransition(String),

    /// The entity is in a state that forbids the requested operation.
    #[error("{0}")]
    InvalidState(String),

    /// Malformed input, rejected before touching persistence.
    #[error("{0}")]
    Validation(String),

    /// Underlying repository failure.
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            // Domain outcomes keep their identity through the layers.
            RepositoryError::NotFound { message, .. } => ServiceError::NotFound(message),
            RepositoryError::ConflictError { message, .. } => ServiceError::Conflict(message),
            other => ServiceError::Repository(other),
        }
    }
}

impl ServiceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn invalid_transition(message: impl Into<String>) -> Self {
        Self::InvalidTransition(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
