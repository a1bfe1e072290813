// ABOUTME: HTTP API for the huddle task tracker
// ABOUTME: Wires handlers, session middleware, and shared state into one router

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod state;

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};

pub use error::{ApiError, ApiResult};
pub use response::ApiResponse;
pub use state::AppState;

/// Build the full API router. Session middleware wraps every route; the
/// whitelist in [`middleware::session`] keeps health and login reachable.
pub fn create_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout));

    let user_routes = Router::new()
        .route("/", get(handlers::users::list_users))
        .route("/password", put(handlers::users::change_password))
        .route("/{id}", put(handlers::users::update_profile))
        .route("/{id}/activation", put(handlers::users::set_activation));

    let task_routes = Router::new()
        .route("/", get(handlers::tasks::list_tasks))
        .route("/", post(handlers::tasks::create_task))
        .route("/trash-actions", post(handlers::tasks::bulk_trash_action))
        .route("/{id}", get(handlers::tasks::get_task))
        .route("/{id}", put(handlers::tasks::update_task))
        .route("/{id}", delete(handlers::tasks::delete_task))
        .route("/{id}/duplicate", post(handlers::tasks::duplicate_task))
        .route("/{id}/trash", put(handlers::tasks::set_trash_state))
        .route("/{id}/subtasks", post(handlers::tasks::add_subtask))
        .route("/{id}/activities", post(handlers::tasks::post_activity));

    let dashboard_routes = Router::new().route("/", get(handlers::tasks::dashboard_stats));

    Router::new()
        .route("/api/health", get(handlers::health::health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/tasks", task_routes)
        .nest("/api/dashboard", dashboard_routes)
        .layer(from_fn_with_state(
            state.clone(),
            middleware::session_middleware,
        ))
        .with_state(state)
}
