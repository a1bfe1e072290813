// ABOUTME: Task and user type definitions
// ABOUTME: Structures for tasks, sub-tasks, activities, accounts, and query filters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStage {
    Todo,
    #[sqlx(rename = "in progress")]
    #[serde(rename = "in progress")]
    InProgress,
    Completed,
}

impl Default for TaskStage {
    fn default() -> Self {
        TaskStage::Todo
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    High,
    Medium,
    Normal,
    Low,
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Normal
    }
}

/// Closed set of timeline entry kinds. Invalid strings are rejected at
/// deserialization, so a malformed type never reaches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Assigned,
    Started,
    #[sqlx(rename = "in progress")]
    #[serde(rename = "in progress")]
    InProgress,
    Bug,
    Completed,
    Commented,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTask {
    pub title: String,
    pub date: Option<DateTime<Utc>>,
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityActor {
    pub id: String,
    pub name: String,
}

/// One immutable entry in a task's timeline. Entries are only ever appended;
/// the id reflects insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: i64,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub activity: String,
    pub by: ActivityActor,
    pub date: DateTime<Utc>,
}

/// A task team member as embedded in task payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub title: String,
    pub role: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    /// Due date shown on boards; defaults to creation time when unset.
    pub date: DateTime<Utc>,
    pub priority: TaskPriority,
    pub stage: TaskStage,
    pub team: Vec<TeamMember>,
    pub assets: Vec<String>,
    pub sub_tasks: Vec<SubTask>,
    pub activities: Vec<Activity>,
    pub is_trashed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCreateInput {
    pub title: String,
    pub date: Option<DateTime<Utc>>,
    pub priority: Option<TaskPriority>,
    pub stage: Option<TaskStage>,
    /// User ids; stored in the given order.
    pub team: Option<Vec<String>>,
    pub assets: Option<Vec<String>>,
}

/// Partial update. `team` and `assets` are whole-array replacements, not
/// element-wise merges.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdateInput {
    pub title: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub priority: Option<TaskPriority>,
    pub stage: Option<TaskStage>,
    pub team: Option<Vec<String>>,
    pub assets: Option<Vec<String>>,
}

/// Listing filter. Trashed tasks stay hidden unless `isTrashed` is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskFilter {
    pub stage: Option<TaskStage>,
    #[serde(rename = "isTrashed")]
    pub trashed: bool,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BulkTrashAction {
    RestoreAll,
    DeleteAll,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub title: String,
    pub role: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User shape returned by the API: everything except password material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub title: String,
    pub role: String,
    pub email: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            title: user.title,
            role: user.role,
            email: user.email,
            is_admin: user.is_admin,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

impl From<&User> for TeamMember {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            title: user.title.clone(),
            role: user.role.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreateInput {
    pub name: String,
    pub title: String,
    pub role: String,
    pub email: String,
    pub password: String,
    pub is_admin: Option<bool>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileUpdate {
    pub name: Option<String>,
    pub title: Option<String>,
    pub role: Option<String>,
}
