//! Session shim. Login looks a user up by username and hands out a token that
//! names the user and a server-side session entry. Passwords are never checked:
//! this is not an authentication system.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use wedfund_store::{Repository, StoreError};
use wedfund_types::api::{Claims, LoginRequest, LoginResponse, SessionResponse};
use wedfund_types::form::FieldErrors;
use wedfund_types::models::User;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub repo: Arc<dyn Repository>,
    pub sessions: Sessions,
    pub jwt_secret: String,
    pub session_days: i64,
    /// Per-person contribution target used by team and default user progress.
    pub target_per_person: i64,
}

struct Session {
    user_id: String,
    expires_at: DateTime<Utc>,
}

/// Live sessions keyed by session id. Expired entries are dropped whenever a
/// new session starts or an expired one is looked up.
#[derive(Default)]
pub struct Sessions {
    inner: RwLock<HashMap<String, Session>>,
}

impl Sessions {
    pub async fn start(&self, user_id: &str, expires_at: DateTime<Utc>) -> String {
        let sid = Uuid::new_v4().to_string();
        let now = Utc::now();
        let mut sessions = self.inner.write().await;
        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(
            sid.clone(),
            Session {
                user_id: user_id.to_string(),
                expires_at,
            },
        );
        sid
    }

    pub async fn is_active(&self, sid: &str, user_id: &str) -> bool {
        {
            let sessions = self.inner.read().await;
            match sessions.get(sid) {
                None => return false,
                Some(s) if s.expires_at > Utc::now() => return s.user_id == user_id,
                Some(_) => {}
            }
        }
        self.inner.write().await.remove(sid);
        false
    }

    /// Returns false when the session was already gone.
    pub async fn end(&self, sid: &str) -> bool {
        self.inner.write().await.remove(sid).is_some()
    }

    /// Drops every session held by `user_id`, returning how many there were.
    pub async fn end_all_for(&self, user_id: &str) -> usize {
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.user_id != user_id);
        before - sessions.len()
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let username = req.username.trim();
    if username.is_empty() {
        let mut fields = FieldErrors::new();
        fields.add("username", "Username is required");
        return Err(ApiError::ValidationFailed(fields));
    }

    let user = state.repo.user_by_username(username)?.ok_or_else(|| {
        debug!("Login for unknown username '{}'", username);
        ApiError::Unauthorized
    })?;

    let expires_at = Utc::now() + Duration::days(state.session_days);
    let sid = state.sessions.start(&user.id, expires_at).await;
    let token = create_token(&state.jwt_secret, &user, &sid, expires_at)?;
    info!("User {} logged in", user.username);

    Ok(Json(LoginResponse { user, token }))
}

/// Resolves the session's user id against the current user list.
pub async fn session(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let user = current_user(&state, &claims)?;
    Ok(Json(SessionResponse { user }))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    if state.sessions.end(&claims.sid).await {
        info!("User {} logged out", claims.sub);
    }
    Ok(StatusCode::NO_CONTENT)
}

/// The user behind a session. A user deleted after login no longer has one.
pub fn current_user(state: &AppStateInner, claims: &Claims) -> Result<User, ApiError> {
    match state.repo.user(&claims.sub) {
        Ok(user) => Ok(user),
        Err(StoreError::NotFound { .. }) => Err(ApiError::Unauthorized),
        Err(e) => Err(e.into()),
    }
}

pub fn create_token(
    secret: &str,
    user: &User,
    sid: &str,
    expires_at: DateTime<Utc>,
) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user.id.clone(),
        sid: sid.to_string(),
        role: user.role,
        exp: expires_at.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_a_day() -> DateTime<Utc> {
        Utc::now() + Duration::days(1)
    }

    #[tokio::test]
    async fn sessions_end_once() {
        let sessions = Sessions::default();
        let sid = sessions.start("7", in_a_day()).await;
        assert!(sessions.is_active(&sid, "7").await);
        assert!(!sessions.is_active(&sid, "8").await);

        assert!(sessions.end(&sid).await);
        assert!(!sessions.end(&sid).await);
        assert!(!sessions.is_active(&sid, "7").await);
    }

    #[tokio::test]
    async fn expired_sessions_are_dropped() {
        let sessions = Sessions::default();
        let stale = sessions.start("7", Utc::now() - Duration::seconds(1)).await;
        assert!(!sessions.is_active(&stale, "7").await);
        assert!(sessions.inner.read().await.is_empty());

        let old = sessions.start("8", Utc::now() - Duration::seconds(1)).await;
        let fresh = sessions.start("8", in_a_day()).await;
        let live = sessions.inner.read().await;
        assert_eq!(live.len(), 1);
        assert!(live.contains_key(&fresh));
        assert!(!live.contains_key(&old));
    }

    #[tokio::test]
    async fn deleted_user_loses_every_session() {
        let sessions = Sessions::default();
        let first = sessions.start("7", in_a_day()).await;
        let second = sessions.start("7", in_a_day()).await;
        let other = sessions.start("8", in_a_day()).await;

        assert_eq!(sessions.end_all_for("7").await, 2);
        assert!(!sessions.is_active(&first, "7").await);
        assert!(!sessions.is_active(&second, "7").await);
        assert!(sessions.is_active(&other, "8").await);
        assert_eq!(sessions.end_all_for("7").await, 0);
    }
}
