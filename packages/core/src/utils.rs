// ABOUTME: Shared utility functions for Huddle
// ABOUTME: Identity generation for tasks and accounts

use nanoid::nanoid;
use uuid::Uuid;

/// Generate a unique task ID (21-character URL-safe format)
pub fn generate_task_id() -> String {
    nanoid!()
}

/// Generate a unique user ID
pub fn generate_user_id() -> String {
    Uuid::new_v4().to_string()
}
