// ABOUTME: Error types for task lifecycle operations

use thiserror::Error;

use huddle_core::ValidationError;
use huddle_storage::StorageError;

pub type TaskResult<T> = Result<T, TaskError>;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation errors: {0:?}")]
    Validation(Vec<ValidationError>),

    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("Team member does not exist: {0}")]
    UnknownTeamMember(String),
}
