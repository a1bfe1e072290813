// ABOUTME: Environment-driven configuration for the server binary

use std::env;
use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

use huddle_core::DEFAULT_SESSION_TTL_HOURS;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid session TTL: {0}")]
    InvalidSessionTtl(String),
}

#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub cors_origin: String,
    /// Database file override; `None` means the default under ~/.huddle.
    pub db_path: Option<PathBuf>,
    pub session_ttl_hours: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port_str = env::var("PORT").unwrap_or_else(|_| "4002".to_string());

        let port = port_str.parse::<u16>()?;

        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let cors_origin =
            env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let db_path = env::var("HUDDLE_DB_PATH").ok().map(PathBuf::from);

        let session_ttl_hours = match env::var("SESSION_TTL_HOURS") {
            Ok(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|ttl| *ttl > 0)
                .ok_or(ConfigError::InvalidSessionTtl(raw))?,
            Err(_) => DEFAULT_SESSION_TTL_HOURS,
        };

        Ok(Config {
            port,
            cors_origin,
            db_path,
            session_ttl_hours,
        })
    }
}
