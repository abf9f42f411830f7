//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures. Infrastructure
/// concerns (connection loss, driver errors) belong to the store layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value or a state transition failed validation.
    #[error("{0}")]
    Validation(String),

    /// A request parameter could not be interpreted (e.g. unknown enum value).
    #[error("{0}")]
    InvalidArgument(String),

    /// A requested resource does not exist, or is hidden from the actor.
    #[error("{0}")]
    NotFound(String),

    /// A unique key is already taken.
    #[error("{0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Human-readable message without the variant tag.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(m) | Self::InvalidArgument(m) | Self::NotFound(m) | Self::Conflict(m) => m,
        }
    }
}
