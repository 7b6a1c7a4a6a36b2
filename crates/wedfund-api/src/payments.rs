use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;
use uuid::Uuid;

use wedfund_types::api::{Claims, PaymentDraft, PaymentQuery};
use wedfund_types::form::{FieldErrors, FormMode};
use wedfund_types::models::{
    NotificationType, Payment, PaymentType, Priority, RelatedType, Role, User,
};

use crate::auth::{AppState, current_user};
use crate::error::ApiError;
use crate::forms::{self, validate_payment};
use crate::middleware::require_role;
use crate::notifications::notify;

pub async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<PaymentQuery>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let mut payments = match query.user_id.as_deref() {
        Some(user_id) => state.repo.payments_for_user(user_id)?,
        None => state.repo.payments()?,
    };
    // Newest first.
    payments.sort_by(|a, b| {
        (b.date, &b.time)
            .cmp(&(a.date, &a.time))
            .then_with(|| a.id.cmp(&b.id))
    });
    Ok(Json(payments))
}

/// Admins record for anyone; responsible members for themselves and their team.
fn may_record_for(actor: &User, target: &User) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::ResponsibleMember => target.id == actor.id || target.is_member_of(&actor.id),
        Role::Member => false,
    }
}

pub async fn create_payment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(draft): Json<PaymentDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = current_user(&state, &claims)?;
    require_role(&actor, &[Role::Admin, Role::ResponsibleMember])?;

    let users = state.repo.users()?;
    let errors = validate_payment(&draft, &users);
    if let Some(target) = users.iter().find(|u| u.id == draft.user_id) {
        if !may_record_for(&actor, target) {
            return Err(ApiError::Forbidden);
        }
    }

    let payment = forms::submit(FormMode::Create, errors, || {
        let now = chrono::Local::now();
        let payment = Payment {
            id: Uuid::new_v4().to_string(),
            user_id: draft.user_id,
            amount: draft.amount,
            date: draft.date.unwrap_or_else(|| now.date_naive()),
            time: draft
                .time
                .unwrap_or_else(|| now.format("%H:%M").to_string()),
            recorded_by: actor.id.clone(),
            recorded_by_name: actor.name.clone(),
            payment_type: draft.payment_type,
            notes: draft.notes,
        };
        Ok(state.repo.insert_payment(payment)?)
    })?;

    info!(
        "{} recorded {:?} payment {} of {} for user {}",
        actor.username, payment.payment_type, payment.id, payment.amount, payment.user_id
    );

    let payer = users
        .iter()
        .find(|u| u.id == payment.user_id)
        .map(|u| u.name.as_str())
        .unwrap_or("unknown member");
    let verb = match payment.payment_type {
        PaymentType::Collect => "collected from",
        PaymentType::Pay => "paid to",
    };
    notify(
        &state,
        NotificationType::PaymentRecorded,
        Priority::Low,
        "Payment recorded",
        format!("{} {} {} by {}", payment.amount, verb, payer, actor.name),
        Some((RelatedType::Payment, &payment.id)),
    );

    Ok((StatusCode::CREATED, Json(payment)))
}

pub async fn update_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
    Extension(claims): Extension<Claims>,
    Json(draft): Json<PaymentDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = current_user(&state, &claims)?;
    require_role(&actor, &[Role::Admin])?;

    let existing = state.repo.payment(&payment_id)?;
    let users = state.repo.users()?;
    let errors = validate_payment(&draft, &users);
    let payment = forms::submit(FormMode::Edit, errors, || {
        // The recorder of the existing entry is kept.
        let payment = Payment {
            id: existing.id,
            user_id: draft.user_id,
            amount: draft.amount,
            date: draft.date.unwrap_or(existing.date),
            time: draft.time.unwrap_or(existing.time),
            recorded_by: existing.recorded_by,
            recorded_by_name: existing.recorded_by_name,
            payment_type: draft.payment_type,
            notes: draft.notes,
        };
        Ok(state.repo.update_payment(payment)?)
    })?;

    info!("{} updated payment {}", actor.username, payment.id);
    Ok(Json(payment))
}

pub async fn delete_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = current_user(&state, &claims)?;
    require_role(&actor, &[Role::Admin])?;

    let payment = forms::submit(FormMode::Delete, FieldErrors::new(), || {
        Ok(state.repo.delete_payment(&payment_id)?)
    })?;

    info!("{} deleted payment {}", actor.username, payment.id);
    Ok(Json(payment))
}
