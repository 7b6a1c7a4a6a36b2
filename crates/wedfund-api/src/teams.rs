use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};

use wedfund_stats::TeamRollup;
use wedfund_types::api::Claims;

use crate::auth::AppState;
use crate::error::ApiError;

pub async fn list_teams(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.repo.snapshot()?;
    let rollups: Vec<TeamRollup> = wedfund_stats::teams(&snapshot.users)
        .iter()
        .map(|t| wedfund_stats::team_rollup(t, &snapshot.payments, state.target_per_person))
        .collect();
    Ok(Json(rollups))
}

pub async fn team_ranking(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.repo.snapshot()?;
    Ok(Json(wedfund_stats::rank_teams(
        &snapshot.users,
        &snapshot.payments,
        state.target_per_person,
    )))
}

pub async fn get_team(
    State(state): State<AppState>,
    Path(leader_id): Path<String>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.repo.snapshot()?;
    let team = wedfund_stats::team(&snapshot.users, &leader_id)?;
    Ok(Json(wedfund_stats::team_detail(
        &team,
        &snapshot.payments,
        crate::today(),
        state.target_per_person,
    )))
}
