use std::sync::RwLock;

use tracing::{debug, info};

use wedfund_types::models::{FundRequest, Notification, Payment, RequestStatus, Role, User};

use crate::{Repository, Result, Snapshot, StoreError, seed};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    payments: Vec<Payment>,
    fund_requests: Vec<FundRequest>,
    notifications: Vec<Notification>,
}

/// Process-local store. Insertion order is preserved for every table.
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }

    /// Store preloaded with the demo community.
    pub fn seeded() -> Self {
        let data = seed::demo();
        info!(
            "Seeded store: {} users, {} payments, {} fund requests, {} notifications",
            data.users.len(),
            data.payments.len(),
            data.fund_requests.len(),
            data.notifications.len()
        );
        Self {
            tables: RwLock::new(Tables {
                users: data.users,
                payments: data.payments,
                fund_requests: data.fund_requests,
                notifications: data.notifications,
            }),
        }
    }

    fn with_tables<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Tables) -> Result<T>,
    {
        let tables = self
            .tables
            .read()
            .map_err(|e| StoreError::Backend(format!("store lock poisoned: {}", e)))?;
        f(&tables)
    }

    fn with_tables_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Tables) -> Result<T>,
    {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| StoreError::Backend(format!("store lock poisoned: {}", e)))?;
        f(&mut tables)
    }
}

fn find<'a, T>(rows: &'a [T], id: &str, key: impl Fn(&T) -> &str) -> Option<&'a T> {
    rows.iter().find(|row| key(row) == id)
}

fn position<T>(rows: &[T], id: &str, key: impl Fn(&T) -> &str) -> Option<usize> {
    rows.iter().position(|row| key(row) == id)
}

/// Hierarchy rules checked against the live table before `user` is written.
fn check_hierarchy(users: &[User], user: &User) -> Result<()> {
    if let Some(leader_id) = user.responsible_member_id.as_deref() {
        let leads = find(users, leader_id, |u| u.id.as_str())
            .is_some_and(|l| l.role == Role::ResponsibleMember && l.id != user.id);
        if user.role != Role::Member || !leads {
            return Err(StoreError::Conflict(format!(
                "user {} cannot report to {}",
                user.id, leader_id
            )));
        }
    } else if user.role == Role::Member {
        return Err(StoreError::Conflict(format!(
            "member {} has no responsible member",
            user.id
        )));
    }

    if user.role != Role::ResponsibleMember && users.iter().any(|u| u.is_member_of(&user.id)) {
        return Err(StoreError::Conflict(format!(
            "user {} still leads a team",
            user.id
        )));
    }
    Ok(())
}

impl Repository for MemoryStore {
    // -- Users --

    fn users(&self) -> Result<Vec<User>> {
        self.with_tables(|t| Ok(t.users.clone()))
    }

    fn user(&self, id: &str) -> Result<User> {
        self.with_tables(|t| {
            find(&t.users, id, |u| u.id.as_str())
                .cloned()
                .ok_or_else(|| StoreError::not_found("user", id))
        })
    }

    fn user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.with_tables(|t| Ok(find(&t.users, username, |u| u.username.as_str()).cloned()))
    }

    fn insert_user(&self, user: User) -> Result<User> {
        self.with_tables_mut(|t| {
            if find(&t.users, &user.id, |u| u.id.as_str()).is_some() {
                return Err(StoreError::AlreadyExists {
                    kind: "user",
                    key: user.id,
                });
            }
            if find(&t.users, &user.username, |u| u.username.as_str()).is_some() {
                return Err(StoreError::AlreadyExists {
                    kind: "username",
                    key: user.username,
                });
            }
            check_hierarchy(&t.users, &user)?;
            t.users.push(user.clone());
            debug!("Inserted user {}", user.id);
            Ok(user)
        })
    }

    fn update_user(&self, user: User) -> Result<User> {
        self.with_tables_mut(|t| {
            let idx = position(&t.users, &user.id, |u| u.id.as_str())
                .ok_or_else(|| StoreError::not_found("user", &user.id))?;
            let taken = t
                .users
                .iter()
                .any(|u| u.username == user.username && u.id != user.id);
            if taken {
                return Err(StoreError::AlreadyExists {
                    kind: "username",
                    key: user.username,
                });
            }
            check_hierarchy(&t.users, &user)?;
            t.users[idx] = user.clone();
            debug!("Updated user {}", user.id);
            Ok(user)
        })
    }

    fn delete_user(&self, id: &str) -> Result<User> {
        self.with_tables_mut(|t| {
            let idx = position(&t.users, id, |u| u.id.as_str())
                .ok_or_else(|| StoreError::not_found("user", id))?;

            if t.users.iter().any(|u| u.is_member_of(id)) {
                return Err(StoreError::Conflict(format!(
                    "user {} still leads a team",
                    id
                )));
            }
            if t.payments.iter().any(|p| p.user_id == id) {
                return Err(StoreError::Conflict(format!("user {} has payments", id)));
            }
            if t.fund_requests.iter().any(|r| r.user_id == id) {
                return Err(StoreError::Conflict(format!(
                    "user {} has fund requests",
                    id
                )));
            }

            Ok(t.users.remove(idx))
        })
    }

    // -- Payments --

    fn payments(&self) -> Result<Vec<Payment>> {
        self.with_tables(|t| Ok(t.payments.clone()))
    }

    fn payments_for_user(&self, user_id: &str) -> Result<Vec<Payment>> {
        self.with_tables(|t| {
            Ok(t.payments
                .iter()
                .filter(|p| p.user_id == user_id)
                .cloned()
                .collect())
        })
    }

    fn payment(&self, id: &str) -> Result<Payment> {
        self.with_tables(|t| {
            find(&t.payments, id, |p| p.id.as_str())
                .cloned()
                .ok_or_else(|| StoreError::not_found("payment", id))
        })
    }

    fn insert_payment(&self, payment: Payment) -> Result<Payment> {
        self.with_tables_mut(|t| {
            if find(&t.payments, &payment.id, |p| p.id.as_str()).is_some() {
                return Err(StoreError::AlreadyExists {
                    kind: "payment",
                    key: payment.id,
                });
            }
            t.payments.push(payment.clone());
            Ok(payment)
        })
    }

    fn update_payment(&self, payment: Payment) -> Result<Payment> {
        self.with_tables_mut(|t| {
            let idx = position(&t.payments, &payment.id, |p| p.id.as_str())
                .ok_or_else(|| StoreError::not_found("payment", &payment.id))?;
            t.payments[idx] = payment.clone();
            Ok(payment)
        })
    }

    fn delete_payment(&self, id: &str) -> Result<Payment> {
        self.with_tables_mut(|t| {
            let idx = position(&t.payments, id, |p| p.id.as_str())
                .ok_or_else(|| StoreError::not_found("payment", id))?;
            Ok(t.payments.remove(idx))
        })
    }

    // -- Fund requests --

    fn fund_requests(&self) -> Result<Vec<FundRequest>> {
        self.with_tables(|t| Ok(t.fund_requests.clone()))
    }

    fn fund_request(&self, id: &str) -> Result<FundRequest> {
        self.with_tables(|t| {
            find(&t.fund_requests, id, |r| r.id.as_str())
                .cloned()
                .ok_or_else(|| StoreError::not_found("fund request", id))
        })
    }

    fn insert_fund_request(&self, request: FundRequest) -> Result<FundRequest> {
        self.with_tables_mut(|t| {
            if find(&t.fund_requests, &request.id, |r| r.id.as_str()).is_some() {
                return Err(StoreError::AlreadyExists {
                    kind: "fund request",
                    key: request.id,
                });
            }
            t.fund_requests.push(request.clone());
            Ok(request)
        })
    }

    fn transition_fund_request(
        &self,
        id: &str,
        expected: RequestStatus,
        change: &mut dyn FnMut(&mut FundRequest),
    ) -> Result<FundRequest> {
        self.with_tables_mut(|t| {
            let idx = position(&t.fund_requests, id, |r| r.id.as_str())
                .ok_or_else(|| StoreError::not_found("fund request", id))?;
            let mut request = t.fund_requests[idx].clone();
            if request.status != expected {
                return Err(StoreError::Conflict(format!(
                    "fund request {} is {:?}, expected {:?}",
                    id, request.status, expected
                )));
            }

            change(&mut request);
            if request.id != id || !request.disbursement_consistent() {
                return Err(StoreError::Conflict(format!(
                    "fund request {} carries disbursement data but is not approved",
                    id
                )));
            }
            debug!("Fund request {} moved to {:?}", id, request.status);
            t.fund_requests[idx] = request.clone();
            Ok(request)
        })
    }

    // -- Notifications --

    fn notifications(&self) -> Result<Vec<Notification>> {
        self.with_tables(|t| Ok(t.notifications.clone()))
    }

    fn insert_notification(&self, notification: Notification) -> Result<Notification> {
        self.with_tables_mut(|t| {
            t.notifications.push(notification.clone());
            Ok(notification)
        })
    }

    fn mark_notification_read(&self, id: &str) -> Result<Notification> {
        self.with_tables_mut(|t| {
            let n = t
                .notifications
                .iter_mut()
                .find(|n| n.id == id)
                .ok_or_else(|| StoreError::not_found("notification", id))?;
            n.is_read = true;
            Ok(n.clone())
        })
    }

    fn mark_all_notifications_read(&self) -> Result<usize> {
        self.with_tables_mut(|t| {
            let mut updated = 0;
            for n in t.notifications.iter_mut().filter(|n| !n.is_read) {
                n.is_read = true;
                updated += 1;
            }
            Ok(updated)
        })
    }

    fn snapshot(&self) -> Result<Snapshot> {
        self.with_tables(|t| {
            Ok(Snapshot {
                users: t.users.clone(),
                payments: t.payments.clone(),
                fund_requests: t.fund_requests.clone(),
            })
        })
    }
}
