// ABOUTME: Task lifecycle manager
// ABOUTME: Validates input, resolves team membership, and drives the storage layer

use std::collections::HashSet;

use tracing::{debug, info};

use huddle_core::{
    validate_subtask, validate_task_data, validate_task_update, Activity, ActivityType,
    BulkTrashAction, SubTask, Task, TaskCreateInput, TaskFilter, TaskUpdateInput,
};
use huddle_storage::{StorageError, TaskStorage, UserStorage};

use crate::error::{TaskError, TaskResult};
use crate::stats::{compute_stats, DashboardStats};

pub struct TaskManager {
    tasks: TaskStorage,
    users: UserStorage,
}

impl TaskManager {
    pub fn new(tasks: TaskStorage, users: UserStorage) -> Self {
        Self { tasks, users }
    }

    /// Create a task. Team ids are deduplicated in order and must all refer
    /// to existing accounts. The new task starts with an empty activity log.
    pub async fn create_task(&self, mut input: TaskCreateInput) -> TaskResult<Task> {
        let issues = validate_task_data(&input);
        if !issues.is_empty() {
            return Err(TaskError::Validation(issues));
        }

        if let Some(team) = input.team.take() {
            input.team = Some(self.normalize_team(&team).await?);
        }

        let task = self.tasks.create_task(&input).await?;
        info!("Created task '{}' with ID {}", task.title, task.id);
        Ok(task)
    }

    pub async fn get_task(&self, task_id: &str) -> TaskResult<Task> {
        match self.tasks.get_task(task_id).await {
            Ok(task) => Ok(task),
            Err(StorageError::NotFound) => Err(TaskError::NotFound(task_id.to_string())),
            Err(e) => Err(TaskError::Storage(e)),
        }
    }

    pub async fn list_tasks(&self, filter: &TaskFilter) -> TaskResult<Vec<Task>> {
        let tasks = self.tasks.list_tasks(filter).await?;
        debug!("Retrieved {} tasks", tasks.len());
        Ok(tasks)
    }

    /// Merge the provided fields onto an existing task. Arrays replace
    /// wholesale. Later writes win; there is no version check.
    pub async fn update_task(&self, task_id: &str, mut input: TaskUpdateInput) -> TaskResult<Task> {
        let issues = validate_task_update(&input);
        if !issues.is_empty() {
            return Err(TaskError::Validation(issues));
        }

        if let Some(team) = input.team.take() {
            input.team = Some(self.normalize_team(&team).await?);
        }

        match self.tasks.update_task(task_id, &input).await {
            Ok(task) => {
                info!("Updated task {}", task.id);
                Ok(task)
            }
            Err(StorageError::NotFound) => Err(TaskError::NotFound(task_id.to_string())),
            Err(e) => Err(TaskError::Storage(e)),
        }
    }

    /// Clone a task under a new identity with a " - Duplicate" title suffix.
    /// Everything else carries over, the activity log included.
    pub async fn duplicate_task(&self, task_id: &str) -> TaskResult<Task> {
        let source = self.get_task(task_id).await?;

        let title = format!("{} - Duplicate", source.title);
        let copy = self.tasks.insert_duplicate(&source, &title).await?;
        info!("Duplicated task {} as {}", source.id, copy.id);
        Ok(copy)
    }

    pub async fn set_trash_state(&self, task_id: &str, trashed: bool) -> TaskResult<Task> {
        match self.tasks.set_trash_state(task_id, trashed).await {
            Ok(task) => {
                info!(
                    "Task {} {}",
                    task.id,
                    if trashed { "moved to trash" } else { "restored" }
                );
                Ok(task)
            }
            Err(StorageError::NotFound) => Err(TaskError::NotFound(task_id.to_string())),
            Err(e) => Err(TaskError::Storage(e)),
        }
    }

    pub async fn delete_task(&self, task_id: &str) -> TaskResult<()> {
        match self.tasks.delete_task(task_id).await {
            Ok(()) => {
                info!("Permanently deleted task {}", task_id);
                Ok(())
            }
            Err(StorageError::NotFound) => Err(TaskError::NotFound(task_id.to_string())),
            Err(e) => Err(TaskError::Storage(e)),
        }
    }

    /// Apply a bulk action to the trashed set. Each action runs as a single
    /// statement, so the batch applies entirely or not at all. Returns the
    /// number of affected tasks.
    pub async fn bulk_trash_action(&self, action: BulkTrashAction) -> TaskResult<u64> {
        let count = match action {
            BulkTrashAction::RestoreAll => self.tasks.restore_all_trashed().await?,
            BulkTrashAction::DeleteAll => self.tasks.delete_all_trashed().await?,
        };

        info!("Applied {:?} to {} trashed tasks", action, count);
        Ok(count)
    }

    pub async fn add_subtask(&self, task_id: &str, subtask: SubTask) -> TaskResult<Task> {
        let issues = validate_subtask(&subtask);
        if !issues.is_empty() {
            return Err(TaskError::Validation(issues));
        }

        match self.tasks.add_subtask(task_id, subtask).await {
            Ok(task) => {
                info!("Added sub-task to task {}", task.id);
                Ok(task)
            }
            Err(StorageError::NotFound) => Err(TaskError::NotFound(task_id.to_string())),
            Err(e) => Err(TaskError::Storage(e)),
        }
    }

    /// Append a timeline entry stamped with the acting user and return the
    /// full log. Entries are immutable once written.
    pub async fn post_activity(
        &self,
        task_id: &str,
        activity_type: ActivityType,
        text: &str,
        actor_id: &str,
    ) -> TaskResult<Vec<Activity>> {
        if let Err(e) = self.users.get_user(actor_id).await {
            return Err(match e {
                StorageError::NotFound => TaskError::UnknownTeamMember(actor_id.to_string()),
                other => TaskError::Storage(other),
            });
        }

        match self
            .tasks
            .append_activity(task_id, activity_type, text, actor_id)
            .await
        {
            Ok(log) => Ok(log),
            Err(StorageError::NotFound) => Err(TaskError::NotFound(task_id.to_string())),
            Err(e) => Err(TaskError::Storage(e)),
        }
    }

    /// Aggregate the dashboard from the current non-trashed task set and the
    /// active roster.
    pub async fn dashboard_stats(&self) -> TaskResult<DashboardStats> {
        let tasks = self.tasks.list_tasks(&TaskFilter::default()).await?;
        let users = self.users.list_active_summaries().await?;
        Ok(compute_stats(&tasks, users))
    }

    /// Deduplicate preserving first occurrence and reject ids without an
    /// account.
    async fn normalize_team(&self, team: &[String]) -> TaskResult<Vec<String>> {
        let mut seen = HashSet::new();
        let mut unique = Vec::new();
        for user_id in team {
            if seen.insert(user_id.as_str()) {
                unique.push(user_id.clone());
            }
        }

        let existing: HashSet<String> = self
            .users
            .filter_existing(&unique)
            .await?
            .into_iter()
            .collect();

        for user_id in &unique {
            if !existing.contains(user_id) {
                return Err(TaskError::UnknownTeamMember(user_id.clone()));
            }
        }

        Ok(unique)
    }
}
