use std::env;
use std::path::PathBuf;

/// Default lifetime of an issued session token.
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// Get the path to the Huddle directory (~/.huddle)
pub fn huddle_dir() -> PathBuf {
    // First try HOME environment variable (useful for tests)
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".huddle")
    } else {
        // Fall back to dirs crate for normal usage
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".huddle")
    }
}

/// Get the default database path (~/.huddle/huddle.db)
pub fn default_db_path() -> PathBuf {
    huddle_dir().join("huddle.db")
}
