// ABOUTME: Shared application state for the HTTP layer
// ABOUTME: Bundles the auth service, task manager, and user storage around one pool

use std::sync::Arc;

use sqlx::SqlitePool;

use huddle_auth::AuthService;
use huddle_storage::{SessionStorage, TaskStorage, UserStorage};
use huddle_tasks::TaskManager;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub auth: Arc<AuthService>,
    pub tasks: Arc<TaskManager>,
    pub users: Arc<UserStorage>,
}

impl AppState {
    pub fn new(pool: SqlitePool, session_ttl_hours: i64) -> Self {
        let auth = AuthService::new(
            UserStorage::new(pool.clone()),
            SessionStorage::new(pool.clone()),
            session_ttl_hours,
        );
        let tasks = TaskManager::new(
            TaskStorage::new(pool.clone()),
            UserStorage::new(pool.clone()),
        );

        Self {
            pool: pool.clone(),
            auth: Arc::new(auth),
            tasks: Arc::new(tasks),
            users: Arc::new(UserStorage::new(pool)),
        }
    }
}
