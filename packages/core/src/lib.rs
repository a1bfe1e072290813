// ABOUTME: Core types, validation, and utilities for Huddle
// ABOUTME: Foundational package providing shared functionality across all Huddle packages

pub mod constants;
pub mod types;
pub mod utils;
pub mod validation;

// Re-export main types
pub use types::{
    Activity, ActivityActor, ActivityType, BulkTrashAction, SubTask, Task, TaskCreateInput,
    TaskFilter, TaskPriority, TaskStage, TaskUpdateInput, TeamMember, User, UserCreateInput,
    UserProfileUpdate, UserSummary,
};

// Re-export constants
pub use constants::{default_db_path, huddle_dir, DEFAULT_SESSION_TTL_HOURS};

// Re-export utilities
pub use utils::{generate_task_id, generate_user_id};

// Re-export validation
pub use validation::{
    validate_password, validate_registration, validate_subtask, validate_task_data,
    validate_task_update, ValidationError, MIN_PASSWORD_LENGTH,
};
