// ABOUTME: Account registration, login, and session authentication
// ABOUTME: Issues opaque bearer tokens backed by hashed session rows

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use huddle_core::{validate_password, validate_registration, User, UserCreateInput, UserSummary};
use huddle_storage::{SessionStorage, StorageError, UserStorage};

use crate::error::{AuthError, AuthResult};
use crate::password::{hash_password, verify_password};
use crate::tokens::{generate_token, hash_token, verify_token_hash};

/// The authenticated caller attached to a request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub name: String,
    pub is_admin: bool,
}

/// What a successful register/login hands back: the account and the raw
/// session token (the only time the raw token exists server-side).
#[derive(Debug)]
pub struct LoginOutcome {
    pub user: UserSummary,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub struct AuthService {
    users: UserStorage,
    sessions: SessionStorage,
    session_ttl_hours: i64,
}

impl AuthService {
    pub fn new(users: UserStorage, sessions: SessionStorage, session_ttl_hours: i64) -> Self {
        Self {
            users,
            sessions,
            session_ttl_hours,
        }
    }

    /// Create an account and sign it in.
    pub async fn register(&self, input: &UserCreateInput) -> AuthResult<LoginOutcome> {
        let issues = validate_registration(input);
        if !issues.is_empty() {
            return Err(AuthError::Validation(issues));
        }

        let password_hash = hash_password(&input.password)?;
        let user = self
            .users
            .create_user(input, &password_hash)
            .await
            .map_err(|e| match e {
                StorageError::DuplicateEmail(email) => AuthError::EmailTaken(email),
                other => AuthError::Storage(other),
            })?;

        info!("Registered user: {}", user.id);
        self.issue_session(user).await
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthResult<LoginOutcome> {
        let user = match self.users.get_user_by_email(email).await? {
            Some(user) => user,
            None => {
                warn!("Login attempt for unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !verify_password(password, &user.password_hash) {
            warn!("Failed login for user: {}", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AuthError::AccountDeactivated);
        }

        info!("User logged in: {}", user.id);
        self.issue_session(user).await
    }

    /// Revoke the session behind a token. Unknown tokens are a no-op.
    pub async fn logout(&self, token: &str) -> AuthResult<()> {
        self.sessions.revoke(&hash_token(token)).await?;
        Ok(())
    }

    /// Resolve a bearer token to its account. Fails on unknown, expired, or
    /// revoked tokens and on deactivated accounts.
    pub async fn authenticate(&self, token: &str) -> AuthResult<CurrentUser> {
        let session = self
            .sessions
            .find_active(&hash_token(token))
            .await?
            .ok_or(AuthError::InvalidToken)?;

        // Constant-time comparison against the fetched row
        if !verify_token_hash(token, &session.token_hash) {
            return Err(AuthError::InvalidToken);
        }

        let user = match self.users.get_user(&session.user_id).await {
            Ok(user) => user,
            Err(StorageError::NotFound) => return Err(AuthError::InvalidToken),
            Err(e) => return Err(AuthError::Storage(e)),
        };

        if !user.is_active {
            return Err(AuthError::AccountDeactivated);
        }

        Ok(CurrentUser {
            id: user.id,
            name: user.name,
            is_admin: user.is_admin,
        })
    }

    pub async fn change_password(&self, user_id: &str, new_password: &str) -> AuthResult<()> {
        let issues = validate_password(new_password);
        if !issues.is_empty() {
            return Err(AuthError::Validation(issues));
        }

        let password_hash = hash_password(new_password)?;
        self.users.update_password(user_id, &password_hash).await?;
        info!("Password changed for user: {}", user_id);
        Ok(())
    }

    /// Drop revoked and expired session rows. Returns the number removed.
    pub async fn purge_expired_sessions(&self) -> AuthResult<u64> {
        Ok(self.sessions.purge_expired().await?)
    }

    async fn issue_session(&self, user: User) -> AuthResult<LoginOutcome> {
        let token = generate_token();
        let expires_at = Utc::now() + Duration::hours(self.session_ttl_hours);
        self.sessions
            .create_session(&user.id, &hash_token(&token), expires_at)
            .await?;

        Ok(LoginOutcome {
            user: user.into(),
            token,
            expires_at,
        })
    }
}
