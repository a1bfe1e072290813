// ABOUTME: Authentication for huddle
// ABOUTME: Password hashing, session tokens, and the account service

pub mod error;
pub mod password;
pub mod service;
pub mod tokens;

pub use error::{AuthError, AuthResult};
pub use service::{AuthService, CurrentUser, LoginOutcome};
