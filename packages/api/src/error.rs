// ABOUTME: API error type and HTTP status mapping
// ABOUTME: Converts domain errors into the standard response envelope

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
};
use thiserror::Error;
use tracing::error;

use huddle_auth::AuthError;
use huddle_core::ValidationError;
use huddle_storage::StorageError;
use huddle_tasks::TaskError;

use crate::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("{0}")]
    Task(#[from] TaskError),

    #[error("{0}")]
    Storage(#[from] StorageError),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Administrator access required")]
    Forbidden,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Map to HTTP status and a client-safe message. Storage internals are
    /// never echoed back.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),

            ApiError::Auth(err) => match err {
                AuthError::InvalidCredentials
                | AuthError::AccountDeactivated
                | AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, err.to_string()),
                AuthError::EmailTaken(_) => (StatusCode::CONFLICT, err.to_string()),
                AuthError::Validation(issues) => {
                    (StatusCode::BAD_REQUEST, describe_issues(issues))
                }
                AuthError::Hash(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                ),
                AuthError::Storage(StorageError::NotFound) => {
                    (StatusCode::NOT_FOUND, "Record not found".to_string())
                }
                AuthError::Storage(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                ),
            },

            ApiError::Task(err) => match err {
                TaskError::NotFound(_) | TaskError::UnknownTeamMember(_) => {
                    (StatusCode::NOT_FOUND, err.to_string())
                }
                TaskError::Validation(issues) => {
                    (StatusCode::BAD_REQUEST, describe_issues(issues))
                }
                TaskError::Storage(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                ),
            },

            ApiError::Storage(err) => match err {
                StorageError::NotFound => (StatusCode::NOT_FOUND, err.to_string()),
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                ),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = self.status_and_message();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Internal error: {}", self);
        }

        (status, ResponseJson(ApiResponse::<()>::error(message))).into_response()
    }
}

fn describe_issues(issues: &[ValidationError]) -> String {
    issues
        .iter()
        .map(|issue| format!("{}: {}", issue.field, issue.message))
        .collect::<Vec<_>>()
        .join("; ")
}
