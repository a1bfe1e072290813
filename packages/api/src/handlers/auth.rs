// ABOUTME: Authentication endpoints for registering, logging in, and logging out
// ABOUTME: Issues session tokens that the middleware validates on every other route

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Extension, Json as ResponseJson,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use huddle_auth::LoginOutcome;
use huddle_core::types::{UserCreateInput, UserSummary};

use crate::error::ApiResult;
use crate::middleware::SessionToken;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Wire shape for a freshly issued session.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub user: UserSummary,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<LoginOutcome> for AuthPayload {
    fn from(outcome: LoginOutcome) -> Self {
        Self {
            user: outcome.user,
            token: outcome.token,
            expires_at: outcome.expires_at,
        }
    }
}

/// Create an account and log it in
pub async fn register(
    State(state): State<AppState>,
    ResponseJson(input): ResponseJson<UserCreateInput>,
) -> ApiResult<impl IntoResponse> {
    info!("Registering account for email: {}", input.email);
    let outcome = state.auth.register(&input).await?;
    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(AuthPayload::from(outcome))),
    ))
}

/// Exchange credentials for a session token
pub async fn login(
    State(state): State<AppState>,
    ResponseJson(request): ResponseJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let outcome = state.auth.login(&request.email, &request.password).await?;
    info!("User {} logged in", outcome.user.id);
    Ok((
        StatusCode::OK,
        ResponseJson(ApiResponse::success(AuthPayload::from(outcome))),
    ))
}

/// Revoke the session that authenticated this request
pub async fn logout(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
) -> ApiResult<impl IntoResponse> {
    state.auth.logout(&token.0).await?;
    Ok((
        StatusCode::OK,
        ResponseJson(ApiResponse::success("Logged out successfully".to_string())),
    ))
}
