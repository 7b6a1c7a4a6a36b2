use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;
use uuid::Uuid;

use wedfund_store::StoreError;
use wedfund_types::api::{
    Claims, DisbursementRequest, FundRequestDraft, FundRequestQuery, ReviewDecision, ReviewRequest,
};
use wedfund_types::form::{FieldErrors, FormMode};
use wedfund_types::models::{
    FundRequest, NotificationType, PaymentStatus, Priority, RelatedType, RequestStatus, Role,
};

use crate::auth::{AppState, current_user};
use crate::error::ApiError;
use crate::forms::{self, validate_fund_request};
use crate::middleware::require_role;
use crate::notifications::notify;

pub async fn list_fund_requests(
    State(state): State<AppState>,
    Query(query): Query<FundRequestQuery>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let mut requests: Vec<FundRequest> = state
        .repo
        .fund_requests()?
        .into_iter()
        .filter(|r| query.status.is_none_or(|s| r.status == s))
        .collect();
    requests.sort_by(|a, b| {
        b.requested_date
            .cmp(&a.requested_date)
            .then_with(|| a.id.cmp(&b.id))
    });
    Ok(Json(requests))
}

pub async fn create_fund_request(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(draft): Json<FundRequestDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = current_user(&state, &claims)?;
    let user_id = draft.user_id.clone().unwrap_or_else(|| actor.id.clone());
    if actor.role == Role::Member && user_id != actor.id {
        return Err(ApiError::Forbidden);
    }

    let users = state.repo.users()?;
    let errors = validate_fund_request(&draft, &user_id, &users);
    let request = forms::submit(FormMode::Create, errors, || {
        let user_name = users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.name.clone())
            .unwrap_or_default();
        let request = FundRequest {
            id: Uuid::new_v4().to_string(),
            user_id,
            user_name,
            amount: draft.amount,
            reason: draft.reason.trim().to_string(),
            status: RequestStatus::Pending,
            repayment_duration: draft.repayment_duration,
            requested_date: crate::today(),
            reviewed_by: None,
            reviewed_date: None,
            payment_date: None,
            paid_amount: None,
            payment_status: None,
        };
        Ok(state.repo.insert_fund_request(request)?)
    })?;

    info!("Fund request {} submitted for {}", request.id, request.user_name);
    notify(
        &state,
        NotificationType::FundRequestSubmitted,
        Priority::Medium,
        "New fund request",
        format!("{} requested {}", request.user_name, request.amount),
        Some((RelatedType::FundRequest, &request.id)),
    );

    Ok((StatusCode::CREATED, Json(request)))
}

pub async fn review_fund_request(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
    Extension(claims): Extension<Claims>,
    Json(review): Json<ReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = current_user(&state, &claims)?;
    require_role(&actor, &[Role::Admin])?;

    let decision = review.decision;
    let reviewed_date = crate::today();
    let mut apply = |request: &mut FundRequest| {
        request.status = decision.into();
        request.reviewed_by = Some(actor.id.clone());
        request.reviewed_date = Some(reviewed_date);
        if decision == ReviewDecision::Approved {
            request.payment_status = Some(PaymentStatus::Pending);
        }
    };

    // Status check and write share one store lock.
    let request = forms::submit(FormMode::Edit, FieldErrors::new(), || {
        state
            .repo
            .transition_fund_request(&request_id, RequestStatus::Pending, &mut apply)
            .map_err(|e| match e {
                StoreError::Conflict(_) => ApiError::Conflict(format!(
                    "fund request {} has already been reviewed",
                    request_id
                )),
                other => other.into(),
            })
    })?;

    info!(
        "{} marked fund request {} as {:?}",
        actor.username, request.id, request.status
    );
    let (notification_type, title, priority) = match review.decision {
        ReviewDecision::Approved => (
            NotificationType::FundRequestApproved,
            "Fund request approved",
            Priority::High,
        ),
        ReviewDecision::Declined => (
            NotificationType::FundRequestDeclined,
            "Fund request declined",
            Priority::Medium,
        ),
    };
    notify(
        &state,
        notification_type,
        priority,
        title,
        format!("{}'s request for {}", request.user_name, request.amount),
        Some((RelatedType::FundRequest, &request.id)),
    );

    Ok(Json(request))
}

/// Records how much of an approved request has been paid out.
pub async fn update_disbursement(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<DisbursementRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = current_user(&state, &claims)?;
    require_role(&actor, &[Role::Admin])?;

    let request = state.repo.fund_request(&request_id)?;
    if request.status != RequestStatus::Approved {
        return Err(ApiError::Conflict(format!(
            "fund request {} is not approved",
            request.id
        )));
    }

    let mut errors = FieldErrors::new();
    errors.check(body.paid_amount >= 0, "paid_amount", "Paid amount cannot be negative");
    errors.check(
        body.paid_amount <= request.amount,
        "paid_amount",
        "Paid amount cannot exceed the approved amount",
    );

    let payment_date = body.payment_date.unwrap_or_else(crate::today);
    let paid = body.paid_amount;
    let mut apply = |request: &mut FundRequest| {
        request.paid_amount = Some(paid);
        request.payment_status = Some(PaymentStatus::from_amounts(paid, request.amount));
        request.payment_date = Some(payment_date);
    };
    let request = forms::submit(FormMode::Edit, errors, || {
        Ok(state
            .repo
            .transition_fund_request(&request.id, RequestStatus::Approved, &mut apply)?)
    })?;

    info!(
        "{} set disbursement of fund request {} to {} of {}",
        actor.username, request.id, body.paid_amount, request.amount
    );
    notify(
        &state,
        NotificationType::DisbursementUpdated,
        Priority::Medium,
        "Disbursement updated",
        format!(
            "{} of {} paid to {}",
            body.paid_amount, request.amount, request.user_name
        ),
        Some((RelatedType::FundRequest, &request.id)),
    );

    Ok(Json(request))
}
