//! End-to-end checks through the router against the seeded demo community.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use wedfund_api::auth::{AppState, AppStateInner, Sessions};
use wedfund_store::MemoryStore;

fn app() -> Router {
    let state: AppState = Arc::new(AppStateInner {
        repo: Arc::new(MemoryStore::seeded()),
        sessions: Sessions::default(),
        jwt_secret: "test-secret".into(),
        session_days: 1,
        target_per_person: 5000,
    });
    wedfund_api::router(state)
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login(app: &Router, username: &str) -> String {
    let (status, body) = call(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "username": username, "password": "anything" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login as {} failed: {}", username, body);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn login_resolves_username_only() {
    let app = app();

    let (status, _) = call(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "username": "nobody", "password": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = call(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "username": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"]["username"], "Username is required");

    let token = login(&app, "rashid").await;
    let (status, body) = call(&app, Method::GET, "/auth/session", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], "2");
    assert_eq!(body["user"]["role"], "responsible_member");
}

#[tokio::test]
async fn logout_invalidates_the_token() {
    let app = app();
    let token = login(&app, "imran").await;

    let (status, _) = call(&app, Method::POST, "/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&app, Method::GET, "/auth/session", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_need_a_token() {
    let app = app();
    let (status, _) = call(&app, Method::GET, "/stats/fund", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(&app, Method::GET, "/stats/fund", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = call(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn fund_summary_over_seed_data() {
    let app = app();
    let token = login(&app, "admin").await;

    let (status, body) = call(&app, Method::GET, "/stats/fund", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_collected"], 40_000);
    assert_eq!(body["total_disbursed"], 160_000);
    assert_eq!(body["total_paid_out"], 100_000);
    assert_eq!(body["balance"], -120_000);
    assert_eq!(body["pending_requests"], 1);
    // The admin account is not a contributor.
    assert_eq!(body["total_users"], 7);
}

#[tokio::test]
async fn payment_recording_respects_roles() {
    let app = app();
    let member = login(&app, "imran").await;
    let leader = login(&app, "rashid").await;
    let admin = login(&app, "admin").await;

    let draft = json!({ "user_id": "4", "amount": 5000 });
    let (status, _) = call(
        &app,
        Method::POST,
        "/payments",
        Some(&member),
        Some(draft.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Hamza belongs to the other team.
    let (status, _) = call(
        &app,
        Method::POST,
        "/payments",
        Some(&leader),
        Some(json!({ "user_id": "6", "amount": 5000 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(&app, Method::POST, "/payments", Some(&leader), Some(draft)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["recorded_by"], "2");
    assert_eq!(body["recorded_by_name"], "Rashid Khan");
    assert_eq!(body["type"], "collect");

    let (status, body) = call(
        &app,
        Method::POST,
        "/payments",
        Some(&admin),
        Some(json!({ "user_id": "4", "amount": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"]["amount"], "Amount must be greater than zero");

    let (status, body) = call(&app, Method::GET, "/users/4/summary", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contributed"], 15_000);
    assert_eq!(body["paid_this_month"], true);
    assert_eq!(body["progress"], 100.0);

    let (_, body) = call(&app, Method::GET, "/payments?user_id=4", Some(&admin), None).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn payments_can_be_edited_and_deleted_by_admin() {
    let app = app();
    let admin = login(&app, "admin").await;
    let leader = login(&app, "rashid").await;

    let edit = json!({ "user_id": "5", "amount": 3500, "notes": "corrected" });
    let (status, _) = call(
        &app,
        Method::PUT,
        "/payments/p4",
        Some(&leader),
        Some(edit.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(&app, Method::PUT, "/payments/p4", Some(&admin), Some(edit)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"], 3500);
    assert_eq!(body["date"], "2024-01-12");
    assert_eq!(body["recorded_by"], "2");

    let (status, _) = call(&app, Method::DELETE, "/payments/p4", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, Method::DELETE, "/payments/p4", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn teams_rank_by_total_paid() {
    let app = app();
    let token = login(&app, "omar").await;

    let (status, body) = call(&app, Method::GET, "/teams/ranking", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let ranking = body.as_array().unwrap();
    assert_eq!(ranking.len(), 2);
    assert_eq!(ranking[0]["leader_id"], "3");
    assert_eq!(ranking[0]["rank"], 1);
    assert_eq!(ranking[0]["total_paid"], 57_000);
    assert_eq!(ranking[0]["progress"], 100.0);
    assert_eq!(ranking[1]["leader_id"], "2");
    assert_eq!(ranking[1]["total_paid"], 23_000);
    assert_eq!(ranking[1]["target"], 15_000);

    let (status, body) = call(&app, Method::GET, "/teams/2", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["members"].as_array().unwrap().len(), 2);
    assert_eq!(body["leader"]["contributed"], 10_000);

    // A member id is not a team.
    let (status, _) = call(&app, Method::GET, "/teams/4", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn fund_request_lifecycle() {
    let app = app();
    let member = login(&app, "omar").await;
    let admin = login(&app, "admin").await;

    let (status, _) = call(
        &app,
        Method::POST,
        "/fund-requests",
        Some(&member),
        Some(json!({ "user_id": "6", "amount": 1000, "reason": "not mine" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(
        &app,
        Method::POST,
        "/fund-requests",
        Some(&member),
        Some(json!({ "amount": 100_000, "reason": "Wedding", "repayment_duration": "18 months" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["user_id"], "8");
    assert_eq!(body["user_name"], "Omar Farooq");
    assert!(body.get("payment_status").is_none());
    let id = body["id"].as_str().unwrap().to_string();

    let review = format!("/fund-requests/{}/review", id);
    let (status, _) = call(
        &app,
        Method::POST,
        &review,
        Some(&member),
        Some(json!({ "decision": "approved" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(
        &app,
        Method::POST,
        &review,
        Some(&admin),
        Some(json!({ "decision": "approved" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "approved");
    assert_eq!(body["reviewed_by"], "1");
    assert_eq!(body["payment_status"], "pending");

    let (status, _) = call(
        &app,
        Method::POST,
        &review,
        Some(&admin),
        Some(json!({ "decision": "declined" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let disbursement = format!("/fund-requests/{}/disbursement", id);
    let (status, body) = call(
        &app,
        Method::POST,
        &disbursement,
        Some(&admin),
        Some(json!({ "paid_amount": 150_000 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["fields"]["paid_amount"].is_string());

    let (status, body) = call(
        &app,
        Method::POST,
        &disbursement,
        Some(&admin),
        Some(json!({ "paid_amount": 40_000, "payment_date": "2024-06-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payment_status"], "partial");
    assert_eq!(body["paid_amount"], 40_000);
    assert_eq!(body["payment_date"], "2024-06-01");

    // Disbursed counts the full approved amount, not what was paid.
    let (_, body) = call(&app, Method::GET, "/stats/fund", Some(&admin), None).await;
    assert_eq!(body["total_disbursed"], 260_000);
    assert_eq!(body["total_paid_out"], 140_000);

    let (status, _) = call(
        &app,
        Method::POST,
        "/fund-requests/r3/disbursement",
        Some(&admin),
        Some(json!({ "paid_amount": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let uri = "/fund-requests?status=pending";
    let (_, body) = call(&app, Method::GET, uri, Some(&admin), None).await;
    let pending = body.as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["id"], "r3");
}

#[tokio::test]
async fn writes_leave_notifications() {
    let app = app();
    let admin = login(&app, "admin").await;

    let (_, before) = call(&app, Method::GET, "/notifications", Some(&admin), None).await;
    assert_eq!(before["unread"], 2);

    let (status, payment) = call(
        &app,
        Method::POST,
        "/payments",
        Some(&admin),
        Some(json!({ "user_id": "5", "amount": 3000, "date": "2024-03-02", "time": "08:15" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, after) = call(&app, Method::GET, "/notifications", Some(&admin), None).await;
    assert_eq!(after["unread"], 3);
    let newest = &after["notifications"][0];
    assert_eq!(newest["type"], "payment_recorded");
    assert_eq!(newest["related_id"], payment["id"]);

    let uri = format!("/notifications/{}/read", newest["id"].as_str().unwrap());
    let (status, body) = call(&app, Method::POST, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_read"], true);

    let (_, body) = call(&app, Method::POST, "/notifications/read-all", Some(&admin), None).await;
    assert_eq!(body["updated"], 2);

    let uri = "/notifications/missing/read";
    let (status, _) = call(&app, Method::POST, uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn user_management_enforces_hierarchy() {
    let app = app();
    let admin = login(&app, "admin").await;
    let leader = login(&app, "yusuf").await;

    let draft = json!({
        "username": "khalid",
        "name": "Khalid Noor",
        "role": "member",
        "marital_status": "Unmarried",
        "assigned_monthly_amount": 5000,
        "responsible_member_id": "3"
    });
    let (status, _) = call(&app, Method::POST, "/users", Some(&leader), Some(draft.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let mut bad = draft.clone();
    bad["responsible_member_id"] = json!("4");
    let (status, body) = call(&app, Method::POST, "/users", Some(&admin), Some(bad)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["fields"]["responsible_member_id"].is_string());

    let (status, created) = call(&app, Method::POST, "/users", Some(&admin), Some(draft)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["responsible_member_id"], "3");

    let (_, team) = call(&app, Method::GET, "/teams/3", Some(&admin), None).await;
    assert_eq!(team["members"].as_array().unwrap().len(), 4);
    assert_eq!(team["rollup"]["target"], 25_000);

    // Leaders with members and users with payments stay.
    let (status, _) = call(&app, Method::DELETE, "/users/3", Some(&admin), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let khalid = login(&app, "khalid").await;
    let uri = format!("/users/{}", created["id"].as_str().unwrap());
    let (status, _) = call(&app, Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, Method::GET, "/auth/session", Some(&khalid), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = call(&app, Method::GET, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call(&app, Method::DELETE, "/users/1", Some(&admin), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["fields"]["id"].is_string());
}

#[tokio::test]
async fn oversized_amounts_are_refused() {
    let app = app();
    let admin = login(&app, "admin").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/payments",
        Some(&admin),
        Some(json!({ "user_id": "4", "amount": i64::MAX })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"]["amount"], "Amount is too large");

    let largest = wedfund_types::models::MAX_AMOUNT;
    let (status, _) = call(
        &app,
        Method::POST,
        "/payments",
        Some(&admin),
        Some(json!({ "user_id": "4", "amount": largest })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = call(&app, Method::GET, "/stats/fund", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_collected"], largest + 40_000);

    let (status, body) = call(&app, Method::GET, "/teams/ranking", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["leader_id"], "2");

    let (status, _) = call(
        &app,
        Method::POST,
        "/fund-requests",
        Some(&admin),
        Some(json!({ "user_id": "4", "amount": largest + 1, "reason": "Wedding" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn second_review_of_a_request_conflicts() {
    let app = app();
    let admin = login(&app, "admin").await;

    let (status, _) = call(
        &app,
        Method::POST,
        "/fund-requests/r3/review",
        Some(&admin),
        Some(json!({ "decision": "declined" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, before) = call(&app, Method::GET, "/notifications", Some(&admin), None).await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/fund-requests/r3/review",
        Some(&admin),
        Some(json!({ "decision": "approved" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "fund request r3 has already been reviewed");

    // The losing review changes nothing and announces nothing.
    let (_, after) = call(&app, Method::GET, "/notifications", Some(&admin), None).await;
    assert_eq!(
        after["notifications"].as_array().unwrap().len(),
        before["notifications"].as_array().unwrap().len()
    );
    let (_, body) = call(&app, Method::GET, "/fund-requests", Some(&admin), None).await;
    let r3 = body
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["id"] == "r3")
        .unwrap();
    assert_eq!(r3["status"], "declined");
    assert!(r3.get("payment_status").is_none());

    let (status, _) = call(
        &app,
        Method::POST,
        "/fund-requests/missing/review",
        Some(&admin),
        Some(json!({ "decision": "approved" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
