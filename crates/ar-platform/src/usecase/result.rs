//! Use Case Result Type

use super::error::UseCaseError;

/// Result type for use case execution.
///
/// ```ignore
/// if name.is_empty() {
///     return UseCaseResult::failure(UseCaseError::validation("VALIDATION_ERROR", "Role name is required"));
/// }
/// ```
pub enum UseCaseResult<T> {
    Success(T),
    Failure(UseCaseError),
}

impl<T> UseCaseResult<T> {
    pub fn failure(error: UseCaseError) -> Self {
        UseCaseResult::Failure(error)
    }

    pub(crate) fn success(value: T) -> Self {
        UseCaseResult::Success(value)
    }

    /// Get the success value, consuming self.
    pub fn unwrap(self) -> T {
        match self {
            UseCaseResult::Success(v) => v,
            UseCaseResult::Failure(e) => panic!("Called unwrap on a Failure: {}", e),
        }
    }

    /// Get the error, consuming self.
    pub fn unwrap_err(self) -> UseCaseError {
        match self {
            UseCaseResult::Success(_) => panic!("Called unwrap_err on a Success"),
            UseCaseResult::Failure(e) => e,
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for UseCaseResult<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UseCaseResult::Success(v) => f.debug_tuple("Success").field(v).finish(),
            UseCaseResult::Failure(e) => f.debug_tuple("Failure").field(e).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_result() {
        let result: UseCaseResult<String> = UseCaseResult::success("test".to_string());
        assert_eq!(result.unwrap(), "test");
    }

    #[test]
    fn test_failure_result() {
        let result: UseCaseResult<String> =
            UseCaseResult::failure(UseCaseError::not_found("ROLE_NOT_FOUND", "missing"));
        assert_eq!(result.unwrap_err().code(), "ROLE_NOT_FOUND");
    }
}
