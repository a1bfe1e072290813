// ABOUTME: Error types for authentication operations
// ABOUTME: Covers credential failures, session token validation, and storage faults

use thiserror::Error;

use huddle_core::ValidationError;
use huddle_storage::StorageError;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account has been deactivated, contact the administrator")]
    AccountDeactivated,

    #[error("Email address is already in use: {0}")]
    EmailTaken(String),

    #[error("Session token expired or invalid")]
    InvalidToken,

    #[error("Validation failed")]
    Validation(Vec<ValidationError>),

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
