use axum::{
    Json, Router, middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{self, AppState};
use crate::middleware::require_auth;
use crate::{fund_requests, notifications, payments, stats, teams, users};

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(auth::login))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/auth/session", get(auth::session))
        .route("/auth/logout", post(auth::logout))
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{user_id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users/{user_id}/summary", get(users::user_summary))
        .route(
            "/payments",
            get(payments::list_payments).post(payments::create_payment),
        )
        .route(
            "/payments/{payment_id}",
            put(payments::update_payment).delete(payments::delete_payment),
        )
        .route(
            "/fund-requests",
            get(fund_requests::list_fund_requests).post(fund_requests::create_fund_request),
        )
        .route(
            "/fund-requests/{request_id}/review",
            post(fund_requests::review_fund_request),
        )
        .route(
            "/fund-requests/{request_id}/disbursement",
            post(fund_requests::update_disbursement),
        )
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/read-all", post(notifications::mark_all_read))
        .route(
            "/notifications/{notification_id}/read",
            post(notifications::mark_read),
        )
        .route("/teams", get(teams::list_teams))
        .route("/teams/ranking", get(teams::team_ranking))
        .route("/teams/{leader_id}", get(teams::get_team))
        .route("/stats/fund", get(stats::fund_summary))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
