// ABOUTME: Request handlers for the API server

pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;
