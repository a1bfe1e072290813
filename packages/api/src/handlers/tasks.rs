// ABOUTME: Task endpoints covering CRUD, trash, subtasks, activity, and the dashboard
// ABOUTME: Mutations are admin only except activity posting, which any member may do

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json as ResponseJson,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use huddle_auth::CurrentUser;
use huddle_core::types::{
    ActivityType, BulkTrashAction, SubTask, TaskCreateInput, TaskFilter, TaskUpdateInput,
};

use crate::error::ApiResult;
use crate::middleware::require_admin;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SetTrashRequest {
    pub trashed: bool,
}

#[derive(Debug, Deserialize)]
pub struct BulkActionRequest {
    pub action: BulkTrashAction,
}

#[derive(Debug, Serialize)]
pub struct BulkActionResult {
    pub count: u64,
}

#[derive(Debug, Deserialize)]
pub struct PostActivityRequest {
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub activity: String,
}

/// List tasks filtered by stage, trash state, and title search
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(filter): Query<TaskFilter>,
) -> ApiResult<impl IntoResponse> {
    let tasks = state.tasks.list_tasks(&filter).await?;
    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(tasks))))
}

/// Fetch a single task with its team and activity log
pub async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let task = state.tasks.get_task(&task_id).await?;
    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(task))))
}

/// Aggregate counts, priority series, recent tasks, and the active roster
pub async fn dashboard_stats(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let stats = state.tasks.dashboard_stats().await?;
    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(stats))))
}

/// Create a task
pub async fn create_task(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ResponseJson(input): ResponseJson<TaskCreateInput>,
) -> ApiResult<impl IntoResponse> {
    require_admin(&current_user)?;

    let task = state.tasks.create_task(input).await?;
    info!("Task {} created by {}", task.id, current_user.id);
    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(task)),
    ))
}

/// Update task fields and team assignments
pub async fn update_task(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(task_id): Path<String>,
    ResponseJson(input): ResponseJson<TaskUpdateInput>,
) -> ApiResult<impl IntoResponse> {
    require_admin(&current_user)?;

    let task = state.tasks.update_task(&task_id, input).await?;
    info!("Task {} updated by {}", task_id, current_user.id);
    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(task))))
}

/// Permanently delete a task
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(task_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    require_admin(&current_user)?;

    state.tasks.delete_task(&task_id).await?;
    info!("Task {} deleted by {}", task_id, current_user.id);
    Ok((
        StatusCode::OK,
        ResponseJson(ApiResponse::success("Task deleted successfully".to_string())),
    ))
}

/// Clone a task, its team, and its activity log under a new id
pub async fn duplicate_task(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(task_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    require_admin(&current_user)?;

    let task = state.tasks.duplicate_task(&task_id).await?;
    info!("Task {} duplicated as {} by {}", task_id, task.id, current_user.id);
    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(task)),
    ))
}

/// Move a task to the trash or restore it
pub async fn set_trash_state(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(task_id): Path<String>,
    ResponseJson(request): ResponseJson<SetTrashRequest>,
) -> ApiResult<impl IntoResponse> {
    require_admin(&current_user)?;

    let task = state.tasks.set_trash_state(&task_id, request.trashed).await?;
    info!(
        "Task {} trashed = {} by {}",
        task_id, request.trashed, current_user.id
    );
    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(task))))
}

/// Restore or permanently delete everything in the trash
pub async fn bulk_trash_action(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ResponseJson(request): ResponseJson<BulkActionRequest>,
) -> ApiResult<impl IntoResponse> {
    require_admin(&current_user)?;

    let count = state.tasks.bulk_trash_action(request.action).await?;
    info!(
        "Bulk trash action {:?} touched {} tasks (by {})",
        request.action, count, current_user.id
    );
    Ok((
        StatusCode::OK,
        ResponseJson(ApiResponse::success(BulkActionResult { count })),
    ))
}

/// Append a subtask to a task's checklist
pub async fn add_subtask(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(task_id): Path<String>,
    ResponseJson(subtask): ResponseJson<SubTask>,
) -> ApiResult<impl IntoResponse> {
    require_admin(&current_user)?;

    let task = state.tasks.add_subtask(&task_id, subtask).await?;
    info!("Subtask added to task {} by {}", task_id, current_user.id);
    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(task))))
}

/// Post an entry to a task's activity timeline
pub async fn post_activity(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(task_id): Path<String>,
    ResponseJson(request): ResponseJson<PostActivityRequest>,
) -> ApiResult<impl IntoResponse> {
    let log = state
        .tasks
        .post_activity(
            &task_id,
            request.activity_type,
            &request.activity,
            &current_user.id,
        )
        .await?;
    Ok((StatusCode::OK, ResponseJson(ApiResponse::success(log))))
}
