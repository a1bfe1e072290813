// ABOUTME: HTTP middleware for the API server

pub mod session;

pub use session::{require_admin, session_middleware, SessionToken};
