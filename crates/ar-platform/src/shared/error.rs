//! Platform Error Types

use thiserror::Error;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response, Json},
};
use utoipa::ToSchema;

use crate::assignment::InvalidPatchError;
use crate::role::error::ManagementError;
use crate::usecase::UseCaseError;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("{}", .0.message())]
    UseCase(#[from] UseCaseError),
}

impl PlatformError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }
}

impl From<ManagementError> for PlatformError {
    fn from(err: ManagementError) -> Self {
        PlatformError::UseCase(err.into())
    }
}

impl From<InvalidPatchError> for PlatformError {
    fn from(err: InvalidPatchError) -> Self {
        PlatformError::UseCase(err.into())
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;

/// Error response body
#[derive(Debug, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for PlatformError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            PlatformError::Validation { .. } => {
                (StatusCode::BAD_REQUEST, crate::usecase::error::VALIDATION_ERROR.to_string())
            }
            PlatformError::UseCase(err) => (
                StatusCode::from_u16(err.http_status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                err.code().to_string(),
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, code = %error_type, "Request failed");
        }

        let body = ErrorResponse {
            error: error_type,
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
