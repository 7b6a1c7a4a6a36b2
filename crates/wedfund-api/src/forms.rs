//! Draft validation and the submit flow every write endpoint goes through.

use tracing::debug;

use wedfund_types::api::{FundRequestDraft, PaymentDraft, UserDraft};
use wedfund_types::form::{FieldErrors, FormMode, FormState};
use wedfund_types::models::{MAX_AMOUNT, Role, User};

use crate::error::ApiError;

const MAX_NOTES_LEN: usize = 500;

/// Positive and no larger than [`MAX_AMOUNT`], so fund totals stay in range.
fn check_amount(errors: &mut FieldErrors, field: &'static str, amount: i64) {
    if amount <= 0 {
        errors.add(field, "Amount must be greater than zero");
    } else if amount > MAX_AMOUNT {
        errors.add(field, "Amount is too large");
    }
}

/// Opens a form, applies the validation outcome, and commits only when the
/// draft is clean. Rejected drafts come back as `ValidationFailed`.
pub fn submit<T, F>(mode: FormMode, errors: FieldErrors, commit: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError>,
{
    match FormState::Closed.open(mode)?.validate(errors)? {
        FormState::Open { errors, .. } => {
            debug!("{:?} form rejected with {} field error(s)", mode, errors.len());
            Err(ApiError::ValidationFailed(errors))
        }
        submitting => {
            let value = commit()?;
            submitting.complete()?;
            Ok(value)
        }
    }
}

pub fn validate_payment(draft: &PaymentDraft, users: &[User]) -> FieldErrors {
    let mut errors = FieldErrors::new();
    check_amount(&mut errors, "amount", draft.amount);
    errors.check(
        users.iter().any(|u| u.id == draft.user_id),
        "user_id",
        "Select an existing member",
    );
    if let Some(notes) = &draft.notes {
        errors.check(
            notes.chars().count() <= MAX_NOTES_LEN,
            "notes",
            "Notes must be 500 characters or fewer",
        );
    }
    if let Some(time) = &draft.time {
        errors.check(!time.trim().is_empty(), "time", "Time cannot be blank");
    }
    errors
}

pub fn validate_fund_request(
    draft: &FundRequestDraft,
    user_id: &str,
    users: &[User],
) -> FieldErrors {
    let mut errors = FieldErrors::new();
    check_amount(&mut errors, "amount", draft.amount);
    errors.check(
        !draft.reason.trim().is_empty(),
        "reason",
        "Reason is required",
    );
    errors.check(
        users.iter().any(|u| u.id == user_id),
        "user_id",
        "Select an existing member",
    );
    errors
}

/// `editing` is the id of the user being edited, if any.
pub fn validate_user(draft: &UserDraft, editing: Option<&str>, users: &[User]) -> FieldErrors {
    let mut errors = FieldErrors::new();

    let username = draft.username.trim();
    let len = username.chars().count();
    if !(3..=32).contains(&len) {
        errors.add("username", "Username must be 3 to 32 characters");
    } else if users
        .iter()
        .any(|u| u.username == username && Some(u.id.as_str()) != editing)
    {
        errors.add("username", "Username is already taken");
    }

    errors.check(!draft.name.trim().is_empty(), "name", "Name is required");
    if draft.assigned_monthly_amount < 0 {
        errors.add("assigned_monthly_amount", "Monthly amount cannot be negative");
    } else if draft.assigned_monthly_amount > MAX_AMOUNT {
        errors.add("assigned_monthly_amount", "Monthly amount is too large");
    }

    match (draft.role, draft.responsible_member_id.as_deref()) {
        (Role::Member, None) => {
            errors.add(
                "responsible_member_id",
                "Members must be assigned to a responsible member",
            );
        }
        (Role::Member, Some(leader_id)) => {
            let valid = users
                .iter()
                .any(|u| u.id == leader_id && u.role == Role::ResponsibleMember)
                && Some(leader_id) != editing;
            errors.check(
                valid,
                "responsible_member_id",
                "Choose an existing responsible member",
            );
        }
        (_, Some(_)) => {
            errors.add(
                "responsible_member_id",
                "Only members can be assigned to a responsible member",
            );
        }
        (_, None) => {}
    }

    // A leader cannot step down while members still report to them.
    if let Some(id) = editing {
        if draft.role != Role::ResponsibleMember && users.iter().any(|u| u.is_member_of(id)) {
            errors.add("role", "Reassign this leader's members first");
        }
    }

    errors
}
