pub mod auth;
pub mod error;
pub mod forms;
pub mod fund_requests;
pub mod middleware;
pub mod notifications;
pub mod payments;
pub mod router;
pub mod stats;
pub mod teams;
pub mod users;

pub use router::router;

/// Calendar date used for "this month" checks and default record dates.
pub(crate) fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
