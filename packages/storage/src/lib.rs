// ABOUTME: SQLite persistence for huddle
// ABOUTME: Pool setup, migrations, and storage types for tasks, users, and sessions

pub mod db;
pub mod error;
pub mod sessions;
pub mod tasks;
pub mod users;

pub use db::{connect, connect_memory};
pub use error::{StorageError, StorageResult};
pub use sessions::{Session, SessionStorage};
pub use tasks::TaskStorage;
pub use users::UserStorage;
