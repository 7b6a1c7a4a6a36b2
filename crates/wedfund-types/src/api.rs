use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{MaritalStatus, Notification, PaymentType, RequestStatus, Role, User};

// -- Session claims --

/// Claims carried by the session token. `sid` names the server-side session
/// entry so logout can invalidate the token before it expires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub sid: String,
    pub role: Role,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    /// Accepted for form compatibility. Never checked.
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: User,
}

// -- Users --

/// Body of both create and edit user forms; edits replace the whole record.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserDraft {
    pub username: String,
    pub name: String,
    pub role: Role,
    pub marital_status: MaritalStatus,
    #[serde(default)]
    pub assigned_monthly_amount: i64,
    #[serde(default)]
    pub responsible_member_id: Option<String>,
}

// -- Payments --

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaymentDraft {
    pub user_id: String,
    pub amount: i64,
    /// Defaults to today.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Defaults to the current wall-clock time, `HH:MM`.
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default = "default_payment_type", rename = "type")]
    pub payment_type: PaymentType,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_payment_type() -> PaymentType {
    PaymentType::Collect
}

#[derive(Debug, Default, Deserialize)]
pub struct PaymentQuery {
    pub user_id: Option<String>,
}

// -- Fund requests --

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FundRequestDraft {
    /// Defaults to the requesting user.
    #[serde(default)]
    pub user_id: Option<String>,
    pub amount: i64,
    pub reason: String,
    #[serde(default)]
    pub repayment_duration: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FundRequestQuery {
    pub status: Option<RequestStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approved,
    Declined,
}

impl From<ReviewDecision> for RequestStatus {
    fn from(d: ReviewDecision) -> Self {
        match d {
            ReviewDecision::Approved => RequestStatus::Approved,
            ReviewDecision::Declined => RequestStatus::Declined,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReviewRequest {
    pub decision: ReviewDecision,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisbursementRequest {
    pub paid_amount: i64,
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
}

// -- Notifications --

#[derive(Debug, Serialize)]
pub struct NotificationList {
    pub unread: usize,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    pub updated: usize,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,
}
