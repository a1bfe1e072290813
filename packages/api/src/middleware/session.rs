// ABOUTME: Session authentication middleware for API requests
// ABOUTME: Resolves bearer tokens to accounts and attaches the current user to the request

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use huddle_auth::CurrentUser;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Paths that are reachable without a session
const WHITELISTED_PATHS: &[&str] = &["/api/health", "/api/auth/register", "/api/auth/login"];

/// Raw bearer token for the authenticated request, kept alongside
/// [`CurrentUser`] so logout can revoke the exact session it rode in on.
#[derive(Clone)]
pub struct SessionToken(pub String);

/// Check if a path requires authentication
fn requires_authentication(path: &str) -> bool {
    !WHITELISTED_PATHS.contains(&path)
}

/// Middleware to validate session tokens on protected routes
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = request.uri().path().to_string();

    if !requires_authentication(&path) {
        debug!("Skipping session check for open path: {}", path);
        return Ok(next.run(request).await);
    }

    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string);

    let token = match token {
        Some(token) if !token.is_empty() => token,
        _ => {
            warn!("Missing bearer token for protected path: {}", path);
            return Err(ApiError::Unauthorized);
        }
    };

    let current_user = state.auth.authenticate(&token).await?;

    debug!(
        "Session validated for user {} on path: {}",
        current_user.id, path
    );
    request.extensions_mut().insert(current_user);
    request.extensions_mut().insert(SessionToken(token));

    Ok(next.run(request).await)
}

/// Guard for routes that only administrators may call.
pub fn require_admin(user: &CurrentUser) -> ApiResult<()> {
    if user.is_admin {
        Ok(())
    } else {
        warn!("User {} attempted an admin-only operation", user.id);
        Err(ApiError::Forbidden)
    }
}
