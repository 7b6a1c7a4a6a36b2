//! Storage abstraction for the fund.
//!
//! Handlers talk to a [`Repository`]; every read hands back owned copies so
//! callers never mutate shared state in place.

pub mod memory;
pub mod seed;

use thiserror::Error;

use wedfund_types::models::{FundRequest, Notification, Payment, RequestStatus, User};

pub use memory::MemoryStore;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("{kind} already exists: {key}")]
    AlreadyExists { kind: &'static str, key: String },
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(kind: &'static str, id: &str) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// A consistent copy of the records the aggregations read.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub users: Vec<User>,
    pub payments: Vec<Payment>,
    pub fund_requests: Vec<FundRequest>,
}

pub trait Repository: Send + Sync {
    // -- Users --
    // Inserts and updates refuse a member whose responsible member is missing
    // or does not hold that role, and a role change that would orphan members.
    fn users(&self) -> Result<Vec<User>>;
    fn user(&self, id: &str) -> Result<User>;
    fn user_by_username(&self, username: &str) -> Result<Option<User>>;
    fn insert_user(&self, user: User) -> Result<User>;
    fn update_user(&self, user: User) -> Result<User>;
    fn delete_user(&self, id: &str) -> Result<User>;

    // -- Payments --
    fn payments(&self) -> Result<Vec<Payment>>;
    fn payments_for_user(&self, user_id: &str) -> Result<Vec<Payment>>;
    fn payment(&self, id: &str) -> Result<Payment>;
    fn insert_payment(&self, payment: Payment) -> Result<Payment>;
    fn update_payment(&self, payment: Payment) -> Result<Payment>;
    fn delete_payment(&self, id: &str) -> Result<Payment>;

    // -- Fund requests --
    fn fund_requests(&self) -> Result<Vec<FundRequest>>;
    fn fund_request(&self, id: &str) -> Result<FundRequest>;
    fn insert_fund_request(&self, request: FundRequest) -> Result<FundRequest>;
    /// Applies `change` only while the stored request is still in `expected`
    /// status, under the same lock as the check. Any other status is a
    /// `Conflict`, as is a change that leaves disbursement data on a request
    /// that is not approved.
    fn transition_fund_request(
        &self,
        id: &str,
        expected: RequestStatus,
        change: &mut dyn FnMut(&mut FundRequest),
    ) -> Result<FundRequest>;

    // -- Notifications --
    fn notifications(&self) -> Result<Vec<Notification>>;
    fn insert_notification(&self, notification: Notification) -> Result<Notification>;
    fn mark_notification_read(&self, id: &str) -> Result<Notification>;
    fn mark_all_notifications_read(&self) -> Result<usize>;

    fn snapshot(&self) -> Result<Snapshot>;
}
