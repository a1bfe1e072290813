// ABOUTME: Session storage layer using SQLite
// ABOUTME: Rows hold token hashes only; raw tokens never touch the database

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{StorageError, StorageResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

pub struct SessionStorage {
    pool: SqlitePool,
}

impl SessionStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_session(
        &self,
        user_id: &str,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> StorageResult<Session> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!("Creating session {} for user {}", id, user_id);

        sqlx::query(
            r#"
            INSERT INTO sessions (id, token_hash, user_id, created_at, expires_at, revoked)
            VALUES (?, ?, ?, ?, ?, 0)
            "#,
        )
        .bind(&id)
        .bind(token_hash)
        .bind(user_id)
        .bind(now)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(Session {
            id,
            user_id: user_id.to_string(),
            token_hash: token_hash.to_string(),
            created_at: now,
            expires_at,
            revoked: false,
        })
    }

    /// Look up an unrevoked, unexpired session by token hash.
    pub async fn find_active(&self, token_hash: &str) -> StorageResult<Option<Session>> {
        let row = sqlx::query("SELECT * FROM sessions WHERE token_hash = ? AND revoked = 0")
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        match row {
            Some(row) => {
                let session = self.row_to_session(&row)?;
                if session.expires_at > Utc::now() {
                    Ok(Some(session))
                } else {
                    Ok(None)
                }
            }
            None => Ok(None),
        }
    }

    /// Revoke the session carrying this token hash. Idempotent.
    pub async fn revoke(&self, token_hash: &str) -> StorageResult<()> {
        sqlx::query("UPDATE sessions SET revoked = 1 WHERE token_hash = ?")
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(())
    }

    /// Delete revoked and expired rows. Returns the number removed.
    pub async fn purge_expired(&self) -> StorageResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE revoked = 1 OR expires_at <= ?")
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(result.rows_affected())
    }

    fn row_to_session(&self, row: &sqlx::sqlite::SqliteRow) -> StorageResult<Session> {
        Ok(Session {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            token_hash: row.try_get("token_hash")?,
            created_at: row.try_get("created_at")?,
            expires_at: row.try_get("expires_at")?,
            revoked: row.try_get::<i64, _>("revoked")? != 0,
        })
    }
}
