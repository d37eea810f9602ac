//! Use Case Errors
//!
//! Categorized error types for use case failures. The category picks the HTTP
//! status, the code is what API clients see.

use serde::{Deserialize, Serialize};

use crate::assignment::InvalidPatchError;
use crate::role::error::ManagementError;

/// Code for request-body validation failures.
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";

/// Categorized error types for use case failures.
///
/// - `ValidationError` -> 400 Bad Request
/// - `NotFoundError` -> 404 Not Found
/// - `ConcurrencyError` -> 409 Conflict
/// - `CommitError` -> 500 Internal Server Error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UseCaseError {
    /// Input validation failed, including malformed patch operations.
    ValidationError { code: String, message: String },

    /// Role or principal does not exist.
    NotFoundError { code: String, message: String },

    /// The role was modified by another writer.
    ConcurrencyError { code: String, message: String },

    /// The store failed.
    CommitError { code: String, message: String },
}

impl UseCaseError {
    pub fn validation(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFoundError {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn concurrency(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConcurrencyError {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn commit(message: impl Into<String>) -> Self {
        Self::CommitError {
            code: "STORAGE_ERROR".to_string(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::ValidationError { code, .. } => code,
            Self::NotFoundError { code, .. } => code,
            Self::ConcurrencyError { code, .. } => code,
            Self::CommitError { code, .. } => code,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::ValidationError { message, .. } => message,
            Self::NotFoundError { message, .. } => message,
            Self::ConcurrencyError { message, .. } => message,
            Self::CommitError { message, .. } => message,
        }
    }

    /// Suggested HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::ValidationError { .. } => 400,
            Self::NotFoundError { .. } => 404,
            Self::ConcurrencyError { .. } => 409,
            Self::CommitError { .. } => 500,
        }
    }
}

impl std::fmt::Display for UseCaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message())
    }
}

impl std::error::Error for UseCaseError {}

impl From<InvalidPatchError> for UseCaseError {
    fn from(err: InvalidPatchError) -> Self {
        UseCaseError::validation(InvalidPatchError::CODE, err.to_string())
    }
}

impl From<ManagementError> for UseCaseError {
    fn from(err: ManagementError) -> Self {
        let message = err.to_string();
        match err {
            ManagementError::RoleNotFound { .. } => UseCaseError::not_found("ROLE_NOT_FOUND", message),
            ManagementError::PrincipalNotFound { .. } => {
                UseCaseError::not_found("PRINCIPAL_NOT_FOUND", message)
            }
            ManagementError::Conflict { .. } => UseCaseError::concurrency("CONFLICT", message),
            ManagementError::Storage(_) | ManagementError::Database(_) => UseCaseError::commit(message),
        }
    }
}
