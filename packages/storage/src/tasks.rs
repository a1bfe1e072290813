// ABOUTME: Task storage layer using SQLite
// ABOUTME: Lifecycle writes, trash handling, team assignment, and the activity log

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use huddle_core::{
    generate_task_id, Activity, ActivityActor, ActivityType, SubTask, Task, TaskCreateInput,
    TaskFilter, TaskUpdateInput, TeamMember,
};

use crate::error::{StorageError, StorageResult};

pub struct TaskStorage {
    pool: SqlitePool,
}

impl TaskStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_task(&self, input: &TaskCreateInput) -> StorageResult<Task> {
        let task_id = generate_task_id();
        let now = Utc::now();
        let stage = input.stage.unwrap_or_default();
        let priority = input.priority.unwrap_or_default();
        let date = input.date.unwrap_or(now);
        let assets = serde_json::to_string(input.assets.as_deref().unwrap_or(&[]))?;

        debug!("Creating task: {}", task_id);

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        sqlx::query(
            r#"
            INSERT INTO tasks (
                id, title, date, priority, stage, assets, sub_tasks,
                is_trashed, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, '[]', 0, ?, ?)
            "#,
        )
        .bind(&task_id)
        .bind(input.title.trim())
        .bind(date)
        .bind(priority)
        .bind(stage)
        .bind(&assets)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

        if let Some(team) = &input.team {
            Self::insert_team(&mut tx, &task_id, team).await?;
        }

        tx.commit().await.map_err(StorageError::Sqlx)?;

        self.get_task(&task_id).await
    }

    pub async fn get_task(&self, task_id: &str) -> StorageResult<Task> {
        let row = sqlx::query("SELECT * FROM tasks WHERE id = ?")
            .bind(task_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let row = row.ok_or(StorageError::NotFound)?;
        let mut task = self.row_to_task(&row)?;
        task.team = self.get_team(task_id).await?;
        task.activities = self.list_activities(task_id).await?;
        Ok(task)
    }

    /// Filtered listing, most recently created first (creation-order ties
    /// resolved newest-insert-first).
    pub async fn list_tasks(&self, filter: &TaskFilter) -> StorageResult<Vec<Task>> {
        debug!("Listing tasks with filter: {:?}", filter);

        let mut conditions = vec!["is_trashed = ?"];
        if filter.stage.is_some() {
            conditions.push("stage = ?");
        }
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        if search.is_some() {
            conditions.push("title LIKE ?");
        }

        let query_str = format!(
            "SELECT * FROM tasks WHERE {} ORDER BY created_at DESC, rowid DESC",
            conditions.join(" AND ")
        );

        let mut q = sqlx::query(&query_str).bind(filter.trashed);
        if let Some(stage) = filter.stage {
            q = q.bind(stage);
        }
        if let Some(term) = search {
            q = q.bind(format!("%{}%", term));
        }

        let rows = q
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let mut tasks = Vec::new();
        for row in &rows {
            let mut task = self.row_to_task(row)?;
            task.team = self.get_team(&task.id).await?;
            task.activities = self.list_activities(&task.id).await?;
            tasks.push(task);
        }

        Ok(tasks)
    }

    pub async fn update_task(
        &self,
        task_id: &str,
        input: &TaskUpdateInput,
    ) -> StorageResult<Task> {
        debug!("Updating task: {}", task_id);

        // Build dynamic UPDATE query based on provided fields
        let mut query = String::from("UPDATE tasks SET updated_at = ?");
        let mut has_updates = false;

        if input.title.is_some() {
            query.push_str(", title = ?");
            has_updates = true;
        }
        if input.date.is_some() {
            query.push_str(", date = ?");
            has_updates = true;
        }
        if input.priority.is_some() {
            query.push_str(", priority = ?");
            has_updates = true;
        }
        if input.stage.is_some() {
            query.push_str(", stage = ?");
            has_updates = true;
        }
        if input.assets.is_some() {
            query.push_str(", assets = ?");
            has_updates = true;
        }

        query.push_str(" WHERE id = ?");

        if !has_updates && input.team.is_none() {
            return self.get_task(task_id).await;
        }

        let assets_json = match &input.assets {
            Some(assets) => Some(serde_json::to_string(assets)?),
            None => None,
        };
        let now = Utc::now();

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        let mut q = sqlx::query(&query).bind(now);

        if let Some(title) = &input.title {
            q = q.bind(title.trim());
        }
        if let Some(date) = &input.date {
            q = q.bind(date);
        }
        if let Some(priority) = input.priority {
            q = q.bind(priority);
        }
        if let Some(stage) = input.stage {
            q = q.bind(stage);
        }
        if let Some(assets) = &assets_json {
            q = q.bind(assets);
        }

        q = q.bind(task_id);

        let result = q.execute(&mut *tx).await.map_err(StorageError::Sqlx)?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        // Team is a whole-array replacement
        if let Some(team) = &input.team {
            sqlx::query("DELETE FROM task_team WHERE task_id = ?")
                .bind(task_id)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::Sqlx)?;
            Self::insert_team(&mut tx, task_id, team).await?;
        }

        tx.commit().await.map_err(StorageError::Sqlx)?;

        self.get_task(task_id).await
    }

    /// Insert a copy of `source` under a fresh identity and the given title.
    /// Everything except identity/timestamps carries over, the activity log
    /// included.
    pub async fn insert_duplicate(&self, source: &Task, title: &str) -> StorageResult<Task> {
        let task_id = generate_task_id();
        let now = Utc::now();
        let assets = serde_json::to_string(&source.assets)?;
        let sub_tasks = serde_json::to_string(&source.sub_tasks)?;

        debug!("Duplicating task {} as {}", source.id, task_id);

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        sqlx::query(
            r#"
            INSERT INTO tasks (
                id, title, date, priority, stage, assets, sub_tasks,
                is_trashed, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&task_id)
        .bind(title)
        .bind(source.date)
        .bind(source.priority)
        .bind(source.stage)
        .bind(&assets)
        .bind(&sub_tasks)
        .bind(source.is_trashed)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

        let team_ids: Vec<String> = source.team.iter().map(|m| m.id.clone()).collect();
        Self::insert_team(&mut tx, &task_id, &team_ids).await?;

        for activity in &source.activities {
            sqlx::query(
                "INSERT INTO task_activities (task_id, type, activity, actor_id, created_at)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&task_id)
            .bind(activity.activity_type)
            .bind(&activity.activity)
            .bind(&activity.by.id)
            .bind(activity.date)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;
        }

        tx.commit().await.map_err(StorageError::Sqlx)?;

        self.get_task(&task_id).await
    }

    /// Move a task in or out of the trash. Only the flag changes, so a
    /// trash/restore round trip leaves the record as it was.
    pub async fn set_trash_state(&self, task_id: &str, trashed: bool) -> StorageResult<Task> {
        debug!("Setting trash state for task {}: {}", task_id, trashed);

        let result = sqlx::query("UPDATE tasks SET is_trashed = ? WHERE id = ?")
            .bind(trashed)
            .bind(task_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        self.get_task(task_id).await
    }

    pub async fn delete_task(&self, task_id: &str) -> StorageResult<()> {
        debug!("Deleting task: {}", task_id);

        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(task_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Restore every trashed task. Single statement, so the batch cannot
    /// partially apply. Returns the number restored.
    pub async fn restore_all_trashed(&self) -> StorageResult<u64> {
        let result = sqlx::query("UPDATE tasks SET is_trashed = 0 WHERE is_trashed = 1")
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(result.rows_affected())
    }

    /// Permanently delete every trashed task. Returns the number removed.
    pub async fn delete_all_trashed(&self) -> StorageResult<u64> {
        let result = sqlx::query("DELETE FROM tasks WHERE is_trashed = 1")
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(result.rows_affected())
    }

    pub async fn add_subtask(&self, task_id: &str, subtask: SubTask) -> StorageResult<Task> {
        debug!("Adding sub-task to task: {}", task_id);

        let row = sqlx::query("SELECT sub_tasks FROM tasks WHERE id = ?")
            .bind(task_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let row = row.ok_or(StorageError::NotFound)?;
        let raw: String = row.try_get("sub_tasks")?;
        let mut sub_tasks: Vec<SubTask> = serde_json::from_str(&raw).unwrap_or_default();
        sub_tasks.push(subtask);

        sqlx::query("UPDATE tasks SET sub_tasks = ?, updated_at = ? WHERE id = ?")
            .bind(serde_json::to_string(&sub_tasks)?)
            .bind(Utc::now())
            .bind(task_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        self.get_task(task_id).await
    }

    /// Append one timeline entry and return the full log. Entries are never
    /// updated or deleted.
    pub async fn append_activity(
        &self,
        task_id: &str,
        activity_type: ActivityType,
        text: &str,
        actor_id: &str,
    ) -> StorageResult<Vec<Activity>> {
        debug!("Appending {:?} activity to task: {}", activity_type, task_id);

        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE id = ?")
            .bind(task_id)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        if exists == 0 {
            return Err(StorageError::NotFound);
        }

        sqlx::query(
            "INSERT INTO task_activities (task_id, type, activity, actor_id, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(task_id)
        .bind(activity_type)
        .bind(text)
        .bind(actor_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        self.list_activities(task_id).await
    }

    /// Timeline in insertion order, actor names resolved.
    pub async fn list_activities(&self, task_id: &str) -> StorageResult<Vec<Activity>> {
        let rows = sqlx::query(
            r#"
            SELECT a.id, a.type, a.activity, a.actor_id, a.created_at, u.name AS actor_name
            FROM task_activities a
            JOIN users u ON u.id = a.actor_id
            WHERE a.task_id = ?
            ORDER BY a.id
            "#,
        )
        .bind(task_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter()
            .map(|row| {
                Ok(Activity {
                    id: row.try_get("id")?,
                    activity_type: row.try_get("type")?,
                    activity: row.try_get("activity")?,
                    by: ActivityActor {
                        id: row.try_get("actor_id")?,
                        name: row.try_get("actor_name")?,
                    },
                    date: row.try_get("created_at")?,
                })
            })
            .collect()
    }

    async fn get_team(&self, task_id: &str) -> StorageResult<Vec<TeamMember>> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.name, u.title, u.role, u.email
            FROM task_team tt
            JOIN users u ON u.id = tt.user_id
            WHERE tt.task_id = ?
            ORDER BY tt.position
            "#,
        )
        .bind(task_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter()
            .map(|row| {
                Ok(TeamMember {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    title: row.try_get("title")?,
                    role: row.try_get("role")?,
                    email: row.try_get("email")?,
                })
            })
            .collect()
    }

    async fn insert_team(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        task_id: &str,
        team: &[String],
    ) -> StorageResult<()> {
        for (position, user_id) in team.iter().enumerate() {
            sqlx::query("INSERT INTO task_team (task_id, user_id, position) VALUES (?, ?, ?)")
                .bind(task_id)
                .bind(user_id)
                .bind(position as i64)
                .execute(&mut **tx)
                .await
                .map_err(StorageError::Sqlx)?;
        }
        Ok(())
    }

    fn row_to_task(&self, row: &sqlx::sqlite::SqliteRow) -> StorageResult<Task> {
        let assets: String = row.try_get("assets")?;
        let sub_tasks: String = row.try_get("sub_tasks")?;

        Ok(Task {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            date: row.try_get("date")?,
            priority: row.try_get("priority")?,
            stage: row.try_get("stage")?,
            team: Vec::new(),       // populated by the caller
            assets: serde_json::from_str(&assets).unwrap_or_default(),
            sub_tasks: serde_json::from_str(&sub_tasks).unwrap_or_default(),
            activities: Vec::new(), // populated by the caller
            is_trashed: row.try_get::<i64, _>("is_trashed")? != 0,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
