//! Notification handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{AppError, AppState, SuccessResponse};
use envis_core::accounts::sync_age;
use envis_core::{Notification, Notifications};

/// A notification with a readable age
#[derive(Debug, Serialize)]
pub struct NotificationView {
    #[serde(flatten)]
    pub notification: Notification,
    /// "2 hours ago", "1 day ago", ...
    pub timestamp: String,
}

/// Response for the notification list
#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<NotificationView>,
    pub unread: usize,
}

impl NotificationsResponse {
    fn new(list: &Notifications, now: DateTime<Utc>) -> Self {
        Self {
            unread: list.unread_count(),
            notifications: list
                .items()
                .iter()
                .cloned()
                .map(|notification| NotificationView {
                    timestamp: sync_age(notification.created_at, now),
                    notification,
                })
                .collect(),
        }
    }
}

/// GET /api/notifications - Notifications, newest first, with the unread count
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
) -> Result<Json<NotificationsResponse>, AppError> {
    let now = state.now();
    let household = state.read()?;
    Ok(Json(NotificationsResponse::new(&household.notifications, now)))
}

/// POST /api/notifications/:id/read - Mark one notification as read
pub async fn mark_notification_read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<NotificationsResponse>, AppError> {
    let now = state.now();
    let list = state.update(|household| {
        let mut next = household.clone();
        next.notifications = household.notifications.mark_read(&id)?;
        let list = next.notifications.clone();
        Ok((next, list))
    })?;

    Ok(Json(NotificationsResponse::new(&list, now)))
}

/// POST /api/notifications/read-all - Mark everything as read
pub async fn mark_all_notifications_read(
    State(state): State<Arc<AppState>>,
) -> Result<Json<NotificationsResponse>, AppError> {
    let now = state.now();
    let list = state.update(|household| {
        let mut next = household.clone();
        next.notifications = household.notifications.mark_all_read();
        let list = next.notifications.clone();
        Ok((next, list))
    })?;

    Ok(Json(NotificationsResponse::new(&list, now)))
}

/// DELETE /api/notifications/:id - Remove a notification
pub async fn remove_notification(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.update(|household| {
        let (list, _) = household.notifications.remove(&id)?;
        let mut next = household.clone();
        next.notifications = list;
        Ok((next, ()))
    })?;

    Ok(SuccessResponse::ok())
}
