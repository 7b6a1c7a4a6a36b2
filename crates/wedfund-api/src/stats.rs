use axum::{Extension, Json, extract::State, response::IntoResponse};

use wedfund_types::api::Claims;

use crate::auth::AppState;
use crate::error::ApiError;

/// Dashboard headline figures.
pub async fn fund_summary(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.repo.snapshot()?;
    Ok(Json(wedfund_stats::fund_summary(
        &snapshot.users,
        &snapshot.payments,
        &snapshot.fund_requests,
        crate::today(),
    )))
}
