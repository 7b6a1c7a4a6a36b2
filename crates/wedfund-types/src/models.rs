use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Largest amount a single payment, request or monthly assignment may carry.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    ResponsibleMember,
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::ResponsibleMember => "responsible_member",
            Self::Member => "member",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaritalStatus {
    Married,
    Unmarried,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub name: String,
    pub role: Role,
    pub marital_status: MaritalStatus,
    pub assigned_monthly_amount: i64,
    /// Leader this member reports to. Only members carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_member_id: Option<String>,
}

impl User {
    pub fn is_member_of(&self, leader_id: &str) -> bool {
        self.responsible_member_id.as_deref() == Some(leader_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    /// Money coming into the fund.
    Collect,
    /// Money going out of the fund.
    Pay,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub user_id: String,
    pub amount: i64,
    pub date: NaiveDate,
    pub time: String,
    pub recorded_by: String,
    pub recorded_by_name: String,
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Declined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Partial,
    Pending,
}

impl PaymentStatus {
    /// Status of a disbursement given how much of the approved amount went out.
    pub fn from_amounts(paid: i64, approved: i64) -> Self {
        if paid <= 0 {
            Self::Pending
        } else if paid >= approved {
            Self::Paid
        } else {
            Self::Partial
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundRequest {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub amount: i64,
    pub reason: String,
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repayment_duration: Option<String>,
    pub requested_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_date: Option<NaiveDate>,

    // Disbursement tracking. Only set once the request is approved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_amount: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
}

impl FundRequest {
    /// Disbursement fields may only be present on approved requests.
    pub fn disbursement_consistent(&self) -> bool {
        self.status == RequestStatus::Approved
            || (self.payment_status.is_none()
                && self.paid_amount.is_none()
                && self.payment_date.is_none())
    }
}

/// A responsible member and the members assigned to them. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Team {
    pub leader: User,
    pub members: Vec<User>,
}

impl Team {
    /// Everyone whose contributions count toward the team: the leader first.
    pub fn people(&self) -> impl Iterator<Item = &User> {
        std::iter::once(&self.leader).chain(self.members.iter())
    }

    pub fn headcount(&self) -> usize {
        self.members.len() + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    PaymentRecorded,
    FundRequestSubmitted,
    FundRequestApproved,
    FundRequestDeclined,
    DisbursementUpdated,
    PaymentReminder,
    Announcement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelatedType {
    Payment,
    FundRequest,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_type: Option<RelatedType>,
}
