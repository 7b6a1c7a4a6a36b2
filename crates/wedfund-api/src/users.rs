use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;
use uuid::Uuid;

use wedfund_types::api::{Claims, UserDraft};
use wedfund_types::form::{FieldErrors, FormMode};
use wedfund_types::models::{Role, User};

use crate::auth::{AppState, current_user};
use crate::error::ApiError;
use crate::forms::{self, validate_user};
use crate::middleware::require_role;

pub async fn list_users(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.repo.users()?))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.repo.user(&user_id)?))
}

fn build_user(id: String, draft: UserDraft) -> User {
    User {
        id,
        username: draft.username.trim().to_string(),
        name: draft.name.trim().to_string(),
        role: draft.role,
        marital_status: draft.marital_status,
        assigned_monthly_amount: draft.assigned_monthly_amount,
        responsible_member_id: draft.responsible_member_id,
    }
}

pub async fn create_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(draft): Json<UserDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = current_user(&state, &claims)?;
    require_role(&actor, &[Role::Admin])?;

    let users = state.repo.users()?;
    let errors = validate_user(&draft, None, &users);
    let user = forms::submit(FormMode::Create, errors, || {
        let user = build_user(Uuid::new_v4().to_string(), draft);
        Ok(state.repo.insert_user(user)?)
    })?;

    info!("{} created user {} ({})", actor.username, user.username, user.role.as_str());
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Extension(claims): Extension<Claims>,
    Json(draft): Json<UserDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = current_user(&state, &claims)?;
    require_role(&actor, &[Role::Admin])?;

    let existing = state.repo.user(&user_id)?;
    let users = state.repo.users()?;
    let errors = validate_user(&draft, Some(&existing.id), &users);
    let user = forms::submit(FormMode::Edit, errors, || {
        Ok(state.repo.update_user(build_user(existing.id, draft))?)
    })?;

    info!("{} updated user {}", actor.username, user.id);
    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = current_user(&state, &claims)?;
    require_role(&actor, &[Role::Admin])?;

    let mut errors = FieldErrors::new();
    errors.check(user_id != actor.id, "id", "You cannot delete your own account");
    let user = forms::submit(FormMode::Delete, errors, || {
        Ok(state.repo.delete_user(&user_id)?)
    })?;

    let ended = state.sessions.end_all_for(&user.id).await;
    info!(
        "{} deleted user {} ({} session(s) ended)",
        actor.username, user.id, ended
    );
    Ok(Json(user))
}

pub async fn user_summary(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.repo.user(&user_id)?;
    let payments = state.repo.payments_for_user(&user.id)?;
    Ok(Json(wedfund_stats::user_summary(
        &user,
        &payments,
        crate::today(),
        state.target_per_person,
    )))
}
