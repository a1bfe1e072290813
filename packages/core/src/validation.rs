// ABOUTME: Field-level validation for task and account inputs
// ABOUTME: Validators return the full list of problems, not just the first

use crate::types::{SubTask, TaskCreateInput, TaskUpdateInput, UserCreateInput};

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Validation errors for request data
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validates task data for creation
pub fn validate_task_data(data: &TaskCreateInput) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if data.title.trim().is_empty() {
        errors.push(ValidationError::new("title", "Task title is required"));
    }

    if let Some(ref team) = data.team {
        if team.iter().any(|id| id.trim().is_empty()) {
            errors.push(ValidationError::new("team", "Team member ids cannot be empty"));
        }
    }

    errors
}

/// Validates task update data
pub fn validate_task_update(data: &TaskUpdateInput) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(ref title) = data.title {
        if title.trim().is_empty() {
            errors.push(ValidationError::new("title", "Task title cannot be empty"));
        }
    }

    if let Some(ref team) = data.team {
        if team.iter().any(|id| id.trim().is_empty()) {
            errors.push(ValidationError::new("team", "Team member ids cannot be empty"));
        }
    }

    errors
}

/// Validates a sub-task before it is appended to a task
pub fn validate_subtask(data: &SubTask) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if data.title.trim().is_empty() {
        errors.push(ValidationError::new("title", "Sub-task title is required"));
    }

    if data.tag.trim().is_empty() {
        errors.push(ValidationError::new("tag", "Sub-task tag is required"));
    }

    errors
}

/// Validates registration data
pub fn validate_registration(data: &UserCreateInput) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if data.name.trim().is_empty() {
        errors.push(ValidationError::new("name", "Name is required"));
    }

    if data.title.trim().is_empty() {
        errors.push(ValidationError::new("title", "Title is required"));
    }

    if data.role.trim().is_empty() {
        errors.push(ValidationError::new("role", "Role is required"));
    }

    if data.email.trim().is_empty() || !data.email.contains('@') {
        errors.push(ValidationError::new("email", "A valid email address is required"));
    }

    errors.extend(validate_password(&data.password));

    errors
}

/// Validates a password (registration and password change)
pub fn validate_password(password: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if password.len() < MIN_PASSWORD_LENGTH {
        errors.push(ValidationError::new(
            "password",
            format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
        ));
    }

    errors
}
