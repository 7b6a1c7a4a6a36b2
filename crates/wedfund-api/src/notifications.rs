use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::warn;
use uuid::Uuid;

use wedfund_types::api::{Claims, MarkAllReadResponse, NotificationList};
use wedfund_types::models::{Notification, NotificationType, Priority, RelatedType};

use crate::auth::{AppState, AppStateInner};
use crate::error::ApiError;

/// Records a notification as a side effect of a write. A failure here never
/// fails the write that triggered it.
pub(crate) fn notify(
    state: &AppStateInner,
    notification_type: NotificationType,
    priority: Priority,
    title: &str,
    message: String,
    related: Option<(RelatedType, &str)>,
) {
    let notification = Notification {
        id: Uuid::new_v4().to_string(),
        title: title.to_string(),
        message,
        notification_type,
        is_read: false,
        created_at: chrono::Utc::now(),
        priority,
        related_id: related.map(|(_, id)| id.to_string()),
        related_type: related.map(|(kind, _)| kind),
    };
    if let Err(e) = state.repo.insert_notification(notification) {
        warn!("Failed to record {:?} notification: {}", notification_type, e);
    }
}

pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let mut notifications = state.repo.notifications()?;
    notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
    let unread = notifications.iter().filter(|n| !n.is_read).count();

    Ok(Json(NotificationList {
        unread,
        notifications,
    }))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Path(notification_id): Path<String>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let notification = state.repo.mark_notification_read(&notification_id)?;
    Ok(Json(notification))
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state.repo.mark_all_notifications_read()?;
    Ok(Json(MarkAllReadResponse { updated }))
}
