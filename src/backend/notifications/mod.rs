//! Notifications Module
//!
//! Persisted per-user notifications with live delivery. The relay writes
//! through the `NotificationStore` first and only then pushes a
//! `notification` event to the owner's open connections, so a user who is
//! offline still finds the record on their next visit.
//!
//! - **`relay`** - `NotificationRelay`: create, list, mark read, domain helpers
//! - **`db`** - PostgreSQL queries for `PgStore`
//! - **`handlers`** - REST handlers under `/api/v1/notifications`

pub mod db;
pub mod handlers;
pub mod relay;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::{NotificationId, ProjectId, TaskId, UserId};

pub use relay::NotificationRelay;

/// A stored notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: NotificationId,
    /// Owner
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    pub project_id: Option<ProjectId>,
    pub task_id: Option<TaskId>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

/// Fields needed to insert a notification
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    pub project_id: Option<ProjectId>,
    pub task_id: Option<TaskId>,
}
