use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use tracing::debug;

use wedfund_types::api::Claims;
use wedfund_types::models::{Role, User};

use crate::auth::AppState;
use crate::error::ApiError;

pub fn decode_token(secret: &str, token: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        debug!("Rejected session token: {}", e);
        ApiError::Unauthorized
    })
}

/// Extract the bearer token, check its session is still live, and expose the
/// claims to handlers.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?;

    let claims = decode_token(&state.jwt_secret, token)?;
    if !state.sessions.is_active(&claims.sid, &claims.sub).await {
        return Err(ApiError::Unauthorized);
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Role checks use the stored user, not the role captured in the token.
pub fn require_role(user: &User, allowed: &[Role]) -> Result<(), ApiError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}
