// ABOUTME: End-to-end tests for the HTTP API
// ABOUTME: Drives the real router over in-memory SQLite with tower::oneshot

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use pretty_assertions::{assert_eq, assert_ne};
use serde_json::{json, Value};
use tower::ServiceExt;

use huddle_api::{create_router, AppState};
use huddle_storage::connect_memory;

async fn test_app() -> Router {
    let pool = connect_memory().await.unwrap();
    create_router(AppState::new(pool, 24))
}

async fn send(
    app: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Register an account and return (user id, session token).
async fn register(app: &Router, name: &str, email: &str, is_admin: bool) -> (String, String) {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": name,
            "title": "Engineer",
            "role": "Developer",
            "email": email,
            "password": "sekret123",
            "isAdmin": is_admin,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");

    let user_id = body["data"]["user"]["id"].as_str().unwrap().to_string();
    let token = body["data"]["token"].as_str().unwrap().to_string();
    (user_id, token)
}

async fn create_task(app: &Router, token: &str, body: Value) -> Value {
    let (status, body) = send(app, "POST", "/api/tasks", Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "create task failed: {body}");
    body["data"].clone()
}

#[tokio::test]
async fn test_health_endpoint_is_open() {
    let app = test_app().await;

    let (status, body) = send(&app, "GET", "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "huddle-api");
}

#[tokio::test]
async fn test_register_login_logout_flow() {
    let app = test_app().await;
    let (_, token) = register(&app, "Ada", "ada@example.com", true).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "ada@example.com", "password": "sekret123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["user"]["email"], "ada@example.com");
    assert!(body["data"]["user"].get("passwordHash").is_none());
    assert!(body["data"]["token"].is_string());
    assert!(body["data"]["expiresAt"].is_string());

    let (status, _) = send(&app, "POST", "/api/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    // The revoked session no longer opens any door.
    let (status, _) = send(&app, "GET", "/api/tasks", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let app = test_app().await;
    register(&app, "Ada", "ada@example.com", false).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "ada@example.com", "password": "wrong"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = test_app().await;

    let (status, body) = send(&app, "GET", "/api/tasks", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_task_crud_over_http() {
    let app = test_app().await;
    let (_, admin) = register(&app, "Ada", "ada@example.com", true).await;

    let task = create_task(
        &app,
        &admin,
        json!({"title": "Ship the release", "priority": "high"}),
    )
    .await;
    let task_id = task["id"].as_str().unwrap();
    assert_eq!(task["stage"], "todo");
    assert_eq!(task["priority"], "high");
    assert_eq!(task["isTrashed"], json!(false));

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/tasks/{task_id}"),
        Some(&admin),
        Some(json!({"stage": "completed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["stage"], "completed");
    assert_eq!(body["data"]["title"], "Ship the release");

    let (status, body) = send(
        &app,
        "GET",
        "/api/tasks?stage=completed",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/tasks/{task_id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/tasks/{task_id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_member_cannot_mutate_tasks() {
    let app = test_app().await;
    let (_, admin) = register(&app, "Ada", "ada@example.com", true).await;
    let (_, member) = register(&app, "Grace", "grace@example.com", false).await;

    let task = create_task(&app, &admin, json!({"title": "Admin only"})).await;
    let task_id = task["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        "/api/tasks",
        Some(&member),
        Some(json!({"title": "Not allowed"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/tasks/{task_id}/trash"),
        Some(&member),
        Some(json!({"trashed": true})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Members can still read.
    let (status, _) = send(&app, "GET", "/api/tasks", Some(&member), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_member_can_post_activity() {
    let app = test_app().await;
    let (_, admin) = register(&app, "Ada", "ada@example.com", true).await;
    let (_, member) = register(&app, "Grace", "grace@example.com", false).await;

    let task = create_task(&app, &admin, json!({"title": "Review me"})).await;
    let task_id = task["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/tasks/{task_id}/activities"),
        Some(&member),
        Some(json!({"type": "commented", "activity": "Looks good to me"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let log = body["data"].as_array().unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0]["type"], "commented");
    assert_eq!(log[0]["activity"], "Looks good to me");
    assert_eq!(log[0]["by"]["name"], "Grace");
}

#[tokio::test]
async fn test_invalid_activity_type_is_rejected() {
    let app = test_app().await;
    let (_, admin) = register(&app, "Ada", "ada@example.com", true).await;

    let task = create_task(&app, &admin, json!({"title": "Strict timeline"})).await;
    let task_id = task["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/tasks/{task_id}/activities"),
        Some(&admin),
        Some(json!({"type": "escalated", "activity": "??"})),
    )
    .await;

    // Unknown enum values die in the JSON extractor.
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_trash_restore_and_bulk_actions() {
    let app = test_app().await;
    let (_, admin) = register(&app, "Ada", "ada@example.com", true).await;

    let first = create_task(&app, &admin, json!({"title": "First"})).await;
    let second = create_task(&app, &admin, json!({"title": "Second"})).await;

    for task in [&first, &second] {
        let id = task["id"].as_str().unwrap();
        let (status, _) = send(
            &app,
            "PUT",
            &format!("/api/tasks/{id}/trash"),
            Some(&admin),
            Some(json!({"trashed": true})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = send(&app, "GET", "/api/tasks", Some(&admin), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
    let (_, body) = send(&app, "GET", "/api/tasks?isTrashed=true", Some(&admin), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = send(
        &app,
        "POST",
        "/api/tasks/trash-actions",
        Some(&admin),
        Some(json!({"action": "restoreAll"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], json!(2));

    let first_id = first["id"].as_str().unwrap();
    let (_, _) = send(
        &app,
        "PUT",
        &format!("/api/tasks/{first_id}/trash"),
        Some(&admin),
        Some(json!({"trashed": true})),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/tasks/trash-actions",
        Some(&admin),
        Some(json!({"action": "deleteAll"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], json!(1));

    let (_, body) = send(&app, "GET", "/api/tasks?isTrashed=true", Some(&admin), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
    let (_, body) = send(&app, "GET", "/api/tasks", Some(&admin), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_creates_detached_copy() {
    let app = test_app().await;
    let (admin_id, admin) = register(&app, "Ada", "ada@example.com", true).await;
    let (member_id, _) = register(&app, "Grace", "grace@example.com", false).await;

    let task = create_task(
        &app,
        &admin,
        json!({"title": "Original", "team": [admin_id, member_id]}),
    )
    .await;
    let task_id = task["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/tasks/{task_id}/duplicate"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let copy_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_ne!(copy_id, task_id);
    assert_eq!(body["data"]["title"], "Original - Duplicate");
    assert_eq!(body["data"]["team"].as_array().unwrap().len(), 2);

    let (_, _) = send(
        &app,
        "PUT",
        &format!("/api/tasks/{task_id}"),
        Some(&admin),
        Some(json!({"title": "Renamed"})),
    )
    .await;

    let (_, body) = send(
        &app,
        "GET",
        &format!("/api/tasks/{copy_id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(body["data"]["title"], "Original - Duplicate");
}

#[tokio::test]
async fn test_subtask_endpoint() {
    let app = test_app().await;
    let (_, admin) = register(&app, "Ada", "ada@example.com", true).await;

    let task = create_task(&app, &admin, json!({"title": "Parent"})).await;
    let task_id = task["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/tasks/{task_id}/subtasks"),
        Some(&admin),
        Some(json!({"title": "Write docs", "tag": "docs", "date": null})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let subtasks = body["data"]["subTasks"].as_array().unwrap();
    assert_eq!(subtasks.len(), 1);
    assert_eq!(subtasks[0]["title"], "Write docs");
}

#[tokio::test]
async fn test_unknown_team_member_is_not_found() {
    let app = test_app().await;
    let (_, admin) = register(&app, "Ada", "ada@example.com", true).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/tasks",
        Some(&admin),
        Some(json!({"title": "Ghost crew", "team": ["no-such-user"]})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_dashboard_stats_over_http() {
    let app = test_app().await;
    let (_, admin) = register(&app, "Ada", "ada@example.com", true).await;

    create_task(&app, &admin, json!({"title": "A", "priority": "high"})).await;
    create_task(&app, &admin, json!({"title": "B"})).await;
    create_task(&app, &admin, json!({"title": "C", "stage": "completed"})).await;

    let (status, body) = send(&app, "GET", "/api/dashboard", Some(&admin), None).await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["totalTasks"], json!(3));
    assert_eq!(data["tasks"]["todo"], json!(2));
    assert_eq!(data["tasks"]["in progress"], json!(0));
    assert_eq!(data["tasks"]["completed"], json!(1));
    assert_eq!(data["last10Task"].as_array().unwrap().len(), 3);
    assert_eq!(data["graphData"].as_array().unwrap().len(), 4);
    assert_eq!(data["users"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_profile_update_is_self_or_admin() {
    let app = test_app().await;
    let (admin_id, admin) = register(&app, "Ada", "ada@example.com", true).await;
    let (member_id, member) = register(&app, "Grace", "grace@example.com", false).await;

    // A member cannot edit someone else's profile.
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/users/{admin_id}"),
        Some(&member),
        Some(json!({"title": "Hacker"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Editing your own profile is fine.
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/users/{member_id}"),
        Some(&member),
        Some(json!({"title": "Senior Engineer"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Senior Engineer");

    // Admins can edit anyone.
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/users/{member_id}"),
        Some(&admin),
        Some(json!({"role": "Lead"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "Lead");
}

#[tokio::test]
async fn test_activation_toggle_locks_out_user() {
    let app = test_app().await;
    let (_, admin) = register(&app, "Ada", "ada@example.com", true).await;
    let (member_id, member) = register(&app, "Grace", "grace@example.com", false).await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/users/{member_id}/activation"),
        Some(&member),
        Some(json!({"isActive": false})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/users/{member_id}/activation"),
        Some(&admin),
        Some(json!({"isActive": false})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isActive"], json!(false));

    // Existing session dies with the account.
    let (status, _) = send(&app, "GET", "/api/tasks", Some(&member), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // And a fresh login is refused.
    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "grace@example.com", "password": "sekret123"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_change_password_flow() {
    let app = test_app().await;
    let (_, member) = register(&app, "Grace", "grace@example.com", false).await;

    let (status, _) = send(
        &app,
        "PUT",
        "/api/users/password",
        Some(&member),
        Some(json!({"password": "n3w-secret"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "grace@example.com", "password": "sekret123"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "grace@example.com", "password": "n3w-secret"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_duplicate_email_conflict() {
    let app = test_app().await;
    register(&app, "Ada", "ada@example.com", false).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Imposter",
            "title": "Engineer",
            "role": "Developer",
            "email": "ADA@example.com",
            "password": "sekret123",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_validation_errors_are_bad_request() {
    let app = test_app().await;
    let (_, admin) = register(&app, "Ada", "ada@example.com", true).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/tasks",
        Some(&admin),
        Some(json!({"title": "   "})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("title"));
}
