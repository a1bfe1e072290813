// ABOUTME: Account endpoints for the roster, profile edits, passwords, and activation
// ABOUTME: Profile edits are self-or-admin; activation toggles are admin only

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json as ResponseJson,
};
use serde::Deserialize;
use tracing::info;

use huddle_auth::CurrentUser;
use huddle_core::types::{UserProfileUpdate, UserSummary};

use crate::error::{ApiError, ApiResult};
use crate::middleware::require_admin;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationRequest {
    pub is_active: bool,
}

/// List every account on the team roster
pub async fn list_users(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let users = state.users.list_summaries().await?;
    Ok((
        StatusCode::OK,
        ResponseJson(ApiResponse::success(users)),
    ))
}

/// Change the password of the calling account
pub async fn change_password(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ResponseJson(request): ResponseJson<ChangePasswordRequest>,
) -> ApiResult<impl IntoResponse> {
    state
        .auth
        .change_password(&current_user.id, &request.password)
        .await?;
    info!("Password changed for user {}", current_user.id);
    Ok((
        StatusCode::OK,
        ResponseJson(ApiResponse::success(
            "Password changed successfully".to_string(),
        )),
    ))
}

/// Update the name, title, or role on a profile
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(user_id): Path<String>,
    ResponseJson(input): ResponseJson<UserProfileUpdate>,
) -> ApiResult<impl IntoResponse> {
    if current_user.id != user_id && !current_user.is_admin {
        return Err(ApiError::Forbidden);
    }

    let user = state.users.update_profile(&user_id, &input).await?;
    info!("Profile updated for user {}", user_id);
    Ok((
        StatusCode::OK,
        ResponseJson(ApiResponse::success(UserSummary::from(user))),
    ))
}

/// Enable or disable an account
pub async fn set_activation(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(user_id): Path<String>,
    ResponseJson(request): ResponseJson<ActivationRequest>,
) -> ApiResult<impl IntoResponse> {
    require_admin(&current_user)?;

    let user = state.users.set_active(&user_id, request.is_active).await?;
    info!(
        "User {} set to active = {} by {}",
        user_id, request.is_active, current_user.id
    );
    Ok((
        StatusCode::OK,
        ResponseJson(ApiResponse::success(UserSummary::from(user))),
    ))
}
