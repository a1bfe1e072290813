// ABOUTME: User storage layer using SQLite
// ABOUTME: Account rows, profile updates, activation state, and roster queries

use chrono::Utc;
use sqlx::{QueryBuilder, Row, SqlitePool};
use tracing::debug;

use huddle_core::{generate_user_id, User, UserCreateInput, UserProfileUpdate, UserSummary};

use crate::error::{StorageError, StorageResult};

pub struct UserStorage {
    pool: SqlitePool,
}

impl UserStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new account. The caller supplies the password hash; raw
    /// passwords never reach this layer.
    pub async fn create_user(
        &self,
        input: &UserCreateInput,
        password_hash: &str,
    ) -> StorageResult<User> {
        let user_id = generate_user_id();
        let now = Utc::now();

        debug!("Creating user: {} ({})", user_id, input.email);

        sqlx::query(
            r#"
            INSERT INTO users (
                id, name, title, role, email, password_hash,
                is_admin, is_active, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user_id)
        .bind(input.name.trim())
        .bind(input.title.trim())
        .bind(input.role.trim())
        .bind(input.email.trim())
        .bind(password_hash)
        .bind(input.is_admin.unwrap_or(false))
        .bind(input.is_active.unwrap_or(true))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StorageError::DuplicateEmail(input.email.trim().to_string())
            }
            _ => StorageError::Sqlx(e),
        })?;

        self.get_user(&user_id).await
    }

    pub async fn get_user(&self, user_id: &str) -> StorageResult<User> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        match row {
            Some(row) => self.row_to_user(&row),
            None => Err(StorageError::NotFound),
        }
    }

    pub async fn get_user_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        match row {
            Some(row) => Ok(Some(self.row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    /// Full roster as API-safe summaries, name order.
    pub async fn list_summaries(&self) -> StorageResult<Vec<UserSummary>> {
        let rows = sqlx::query("SELECT * FROM users ORDER BY name COLLATE NOCASE, rowid")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(|row| self.row_to_summary(row)).collect()
    }

    /// Active roster for the dashboard, newest account first.
    pub async fn list_active_summaries(&self) -> StorageResult<Vec<UserSummary>> {
        let rows = sqlx::query(
            "SELECT * FROM users WHERE is_active = 1 ORDER BY created_at DESC, rowid DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(|row| self.row_to_summary(row)).collect()
    }

    /// Which of the given ids exist. Callers pass deduplicated lists.
    pub async fn filter_existing(&self, user_ids: &[String]) -> StorageResult<Vec<String>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::new("SELECT id FROM users WHERE id IN (");
        let mut separated = builder.separated(", ");
        for user_id in user_ids {
            separated.push_bind(user_id);
        }
        separated.push_unseparated(")");

        let ids: Vec<String> = builder
            .build_query_scalar()
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(ids)
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        input: &UserProfileUpdate,
    ) -> StorageResult<User> {
        debug!("Updating profile for user: {}", user_id);

        // Build dynamic UPDATE query based on provided fields
        let mut query = String::from("UPDATE users SET updated_at = ?");
        let mut has_updates = false;

        if input.name.is_some() {
            query.push_str(", name = ?");
            has_updates = true;
        }
        if input.title.is_some() {
            query.push_str(", title = ?");
            has_updates = true;
        }
        if input.role.is_some() {
            query.push_str(", role = ?");
            has_updates = true;
        }

        query.push_str(" WHERE id = ?");

        if !has_updates {
            return self.get_user(user_id).await;
        }

        let now = Utc::now();
        let mut q = sqlx::query(&query).bind(now);

        if let Some(name) = &input.name {
            q = q.bind(name.trim());
        }
        if let Some(title) = &input.title {
            q = q.bind(title.trim());
        }
        if let Some(role) = &input.role {
            q = q.bind(role.trim());
        }

        q = q.bind(user_id);

        let result = q.execute(&self.pool).await.map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        self.get_user(user_id).await
    }

    pub async fn set_active(&self, user_id: &str, is_active: bool) -> StorageResult<User> {
        debug!("Setting user {} active = {}", user_id, is_active);

        let result = sqlx::query("UPDATE users SET is_active = ?, updated_at = ? WHERE id = ?")
            .bind(is_active)
            .bind(Utc::now())
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        self.get_user(user_id).await
    }

    pub async fn update_password(&self, user_id: &str, password_hash: &str) -> StorageResult<()> {
        let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(Utc::now())
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    fn row_to_user(&self, row: &sqlx::sqlite::SqliteRow) -> StorageResult<User> {
        Ok(User {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            title: row.try_get("title")?,
            role: row.try_get("role")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            is_admin: row.try_get::<i64, _>("is_admin")? != 0,
            is_active: row.try_get::<i64, _>("is_active")? != 0,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn row_to_summary(&self, row: &sqlx::sqlite::SqliteRow) -> StorageResult<UserSummary> {
        Ok(self.row_to_user(row)?.into())
    }
}
