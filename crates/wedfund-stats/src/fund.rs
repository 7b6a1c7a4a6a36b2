use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use wedfund_types::models::{FundRequest, Payment, PaymentType, RequestStatus, Role, User};

/// Sums amounts without overflowing. Totals pin at the `i64` bounds.
pub(crate) fn sum_amounts(amounts: impl Iterator<Item = i64>) -> i64 {
    amounts.fold(0, i64::saturating_add)
}

/// Money that came into the fund: collect-type payments only.
pub fn total_collected(payments: &[Payment]) -> i64 {
    let amounts = payments
        .iter()
        .filter(|p| p.payment_type == PaymentType::Collect)
        .map(|p| p.amount);
    sum_amounts(amounts)
}

/// Approved request amounts, whether or not they have been fully paid out.
pub fn total_disbursed(requests: &[FundRequest]) -> i64 {
    let amounts = requests
        .iter()
        .filter(|r| r.status == RequestStatus::Approved)
        .map(|r| r.amount);
    sum_amounts(amounts)
}

/// Same figure as [`total_disbursed`], under the name the spending screens use.
pub fn total_spent(requests: &[FundRequest]) -> i64 {
    total_disbursed(requests)
}

/// What actually left the fund against approved requests so far.
pub fn total_paid_out(requests: &[FundRequest]) -> i64 {
    let amounts = requests
        .iter()
        .filter(|r| r.status == RequestStatus::Approved)
        .filter_map(|r| r.paid_amount);
    sum_amounts(amounts)
}

pub fn total_fund_balance(payments: &[Payment], requests: &[FundRequest]) -> i64 {
    total_collected(payments).saturating_sub(total_disbursed(requests))
}

/// Sum of every payment recorded against the user, regardless of type.
/// Unknown users contribute 0.
pub fn user_total_contributed(payments: &[Payment], user_id: &str) -> i64 {
    let amounts = payments
        .iter()
        .filter(|p| p.user_id == user_id)
        .map(|p| p.amount);
    sum_amounts(amounts)
}

/// Calendar check only: month and year of a payment must match `today`.
pub fn has_user_paid_this_month(payments: &[Payment], user_id: &str, today: NaiveDate) -> bool {
    payments.iter().any(|p| {
        p.user_id == user_id && p.date.year() == today.year() && p.date.month() == today.month()
    })
}

/// `paid / target` as a percentage clamped to `[0, 100]`. A non-positive
/// target yields 0.
pub fn progress_percent(paid: i64, target: i64) -> f64 {
    if target <= 0 {
        return 0.0;
    }
    (paid as f64 / target as f64 * 100.0).clamp(0.0, 100.0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
    pub user_id: String,
    pub name: String,
    pub contributed: i64,
    pub paid_this_month: bool,
    pub target: i64,
    pub progress: f64,
}

/// Per-user progress. The target is the user's assigned monthly amount, or
/// `default_target` when none is assigned.
pub fn user_summary(
    user: &User,
    payments: &[Payment],
    today: NaiveDate,
    default_target: i64,
) -> UserSummary {
    let contributed = user_total_contributed(payments, &user.id);
    let target = if user.assigned_monthly_amount > 0 {
        user.assigned_monthly_amount
    } else {
        default_target
    };
    UserSummary {
        user_id: user.id.clone(),
        name: user.name.clone(),
        contributed,
        paid_this_month: has_user_paid_this_month(payments, &user.id, today),
        target,
        progress: progress_percent(contributed, target),
    }
}

/// Fund-wide figures. User counts cover contributors only; admin accounts are
/// left out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundSummary {
    pub total_collected: i64,
    pub total_disbursed: i64,
    pub total_paid_out: i64,
    pub balance: i64,
    pub pending_requests: usize,
    pub total_users: usize,
    pub users_paid_this_month: usize,
}

pub fn fund_summary(
    users: &[User],
    payments: &[Payment],
    requests: &[FundRequest],
    today: NaiveDate,
) -> FundSummary {
    let contributors = users.iter().filter(|u| u.role != Role::Admin);
    FundSummary {
        total_collected: total_collected(payments),
        total_disbursed: total_disbursed(requests),
        total_paid_out: total_paid_out(requests),
        balance: total_fund_balance(payments, requests),
        pending_requests: requests
            .iter()
            .filter(|r| r.status == RequestStatus::Pending)
            .count(),
        total_users: contributors.clone().count(),
        users_paid_this_month: contributors
            .filter(|u| has_user_paid_this_month(payments, &u.id, today))
            .count(),
    }
}
