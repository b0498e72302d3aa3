/**
 * Notification Handlers
 *
 * All routes are gated and act on the caller's own notifications only.
 *
 * - `GET /api/v1/notifications` - page of notifications plus counts
 * - `GET /api/v1/notifications/unread-count`
 * - `PATCH /api/v1/notifications/{id}/read`
 * - `PATCH /api/v1/notifications/mark-all-read`
 */

use axum::{
    extract::State,
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::backend::error::BackendError;
use crate::backend::middleware::{ApiPath, ApiQuery, AuthUser};
use crate::backend::notifications::relay::DEFAULT_PAGE_SIZE;
use crate::backend::notifications::Notification;
use crate::backend::server::AppState;
use crate::shared::NotificationId;

/// Query string of the list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    #[serde(default)]
    pub unread_only: bool,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
            unread_only: false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NotificationList {
    pub notifications: Vec<Notification>,
    pub total: i64,
    pub unread_count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UnreadCount {
    pub unread_count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MarkReadResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MarkAllReadResponse {
    pub message: String,
    pub count: u64,
}

/// List the caller's notifications, newest first
pub async fn list_notifications(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<NotificationList>, BackendError> {
    let notifications = state
        .notifications
        .list(user.id, params.limit, params.offset, params.unread_only)
        .await?;
    let total = state.notifications.total_count(user.id).await?;
    let unread_count = state.notifications.unread_count(user.id).await?;

    Ok(Json(NotificationList {
        notifications,
        total,
        unread_count,
    }))
}

pub async fn unread_count(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UnreadCount>, BackendError> {
    let unread_count = state.notifications.unread_count(user.id).await?;
    Ok(Json(UnreadCount { unread_count }))
}

/// Mark one notification read
///
/// # Errors
///
/// * `404 Not Found` - No such notification, or it belongs to someone else
pub async fn mark_read(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<NotificationId>,
) -> Result<Json<MarkReadResponse>, BackendError> {
    if !state.notifications.mark_read(id, user.id).await? {
        return Err(BackendError::not_found("Notification not found"));
    }

    Ok(Json(MarkReadResponse {
        message: "Notification marked as read".to_string(),
    }))
}

pub async fn mark_all_read(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<MarkAllReadResponse>, BackendError> {
    let count = state.notifications.mark_all_read(user.id).await?;
    tracing::debug!(user_id = %user.id, count, "Marked notifications read");

    Ok(Json(MarkAllReadResponse {
        message: format!("Marked {} notifications as read", count),
        count,
    }))
}
