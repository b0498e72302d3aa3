/**
 * Notification Relay
 *
 * Persists a notification, then pushes it to the owner's open connections.
 * Persistence is the part that matters: a failed or impossible push (user
 * offline, socket closing) is logged and otherwise ignored.
 */

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::backend::notifications::{NewNotification, Notification};
use crate::backend::realtime::ConnectionRegistry;
use crate::backend::storage::{NotificationStore, StorageError};
use crate::shared::{NotificationId, ProjectId, RealtimeEvent, TaskId, UserId};

/// Page size used when the client does not ask for one
pub const DEFAULT_PAGE_SIZE: i64 = 50;
/// Largest page the list operation will return
pub const MAX_PAGE_SIZE: i64 = 100;
/// Comment text quoted in a notification is cut to this many characters
pub const COMMENT_PREVIEW_CHARS: usize = 100;

/// What the relay needs to know about a task
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSummary {
    pub id: TaskId,
    pub title: String,
    pub project_id: ProjectId,
    pub creator_id: UserId,
    pub assignee_id: Option<UserId>,
}

/// What the relay needs to know about a comment
#[derive(Debug, Clone, PartialEq)]
pub struct CommentSummary {
    pub author_id: UserId,
    pub author_username: String,
    pub content: String,
}

/// Creates, lists and marks notifications; pushes new ones live
#[derive(Clone)]
pub struct NotificationRelay {
    store: Arc<dyn NotificationStore>,
    registry: Arc<ConnectionRegistry>,
}

impl NotificationRelay {
    pub fn new(store: Arc<dyn NotificationStore>, registry: Arc<ConnectionRegistry>) -> Self {
        Self { store, registry }
    }

    /// Persist a notification and push it to the owner
    ///
    /// # Arguments
    /// * `user_id` - Recipient
    /// * `title` - Short heading
    /// * `message` - Body text
    /// * `project_id` - Project the notification is about, if any
    /// * `task_id` - Task the notification is about, if any
    ///
    /// # Returns
    /// The stored record; only a storage failure is an error
    pub async fn create(
        &self,
        user_id: UserId,
        title: impl Into<String>,
        message: impl Into<String>,
        project_id: Option<ProjectId>,
        task_id: Option<TaskId>,
    ) -> Result<Notification, StorageError> {
        let notification = self
            .store
            .insert_notification(NewNotification {
                user_id,
                title: title.into(),
                message: message.into(),
                project_id,
                task_id,
            })
            .await?;

        let delivered = self
            .registry
            .send_to_identity(&RealtimeEvent::notification(payload(&notification)), user_id);

        tracing::info!(
            notification_id = %notification.id,
            user_id = %user_id,
            delivered,
            "Notification created"
        );
        Ok(notification)
    }

    /// Mark one of `user_id`'s notifications read
    ///
    /// # Returns
    /// `false` if no notification with that id belongs to the user
    pub async fn mark_read(
        &self,
        id: NotificationId,
        user_id: UserId,
    ) -> Result<bool, StorageError> {
        self.store.mark_read(id, user_id).await
    }

    /// Mark every unread notification of `user_id` read
    pub async fn mark_all_read(&self, user_id: UserId) -> Result<u64, StorageError> {
        self.store.mark_all_read(user_id).await
    }

    /// A page of notifications, newest first; `limit` is clamped to 1..=100
    pub async fn list(
        &self,
        user_id: UserId,
        limit: i64,
        offset: i64,
        unread_only: bool,
    ) -> Result<Vec<Notification>, StorageError> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let offset = offset.max(0);
        self.store
            .list_notifications(user_id, limit, offset, unread_only)
            .await
    }

    pub async fn total_count(&self, user_id: UserId) -> Result<i64, StorageError> {
        self.store.count_notifications(user_id).await
    }

    pub async fn unread_count(&self, user_id: UserId) -> Result<i64, StorageError> {
        self.store.count_unread(user_id).await
    }

    /// Tell `assignee` they were put on a task
    pub async fn notify_task_assigned(
        &self,
        task_id: TaskId,
        task_title: &str,
        project_id: ProjectId,
        project_name: &str,
        assignee: UserId,
    ) -> Result<Notification, StorageError> {
        self.create(
            assignee,
            format!("Task assigned: {}", task_title),
            format!(
                "You have been assigned to '{}' in project '{}'",
                task_title, project_name
            ),
            Some(project_id),
            Some(task_id),
        )
        .await
    }

    /// Notify everyone interested in a new comment
    ///
    /// Recipients are the task's assignee and creator (skipping the commenter)
    /// plus every mentioned user, each notified once.
    pub async fn notify_comment(
        &self,
        task: &TaskSummary,
        comment: &CommentSummary,
        mentioned: &[UserId],
    ) -> Result<Vec<Notification>, StorageError> {
        let mut recipients = BTreeSet::new();
        if let Some(assignee) = task.assignee_id {
            if assignee != comment.author_id {
                recipients.insert(assignee);
            }
        }
        if task.creator_id != comment.author_id {
            recipients.insert(task.creator_id);
        }
        recipients.extend(mentioned.iter().copied());

        let title = format!("New comment on: {}", task.title);
        let message = format!(
            "'{}' commented: {}",
            comment.author_username,
            preview(&comment.content)
        );

        let mut created = Vec::with_capacity(recipients.len());
        for user_id in recipients {
            created.push(
                self.create(
                    user_id,
                    title.clone(),
                    message.clone(),
                    Some(task.project_id),
                    Some(task.id),
                )
                .await?,
            );
        }
        Ok(created)
    }
}

/// The `data` object of a `notification` event
fn payload(notification: &Notification) -> Value {
    json!({
        "id": notification.id,
        "title": notification.title,
        "message": notification.message,
        "created_at": notification.created_at.to_rfc3339(),
        "project_id": notification.project_id,
        "task_id": notification.task_id,
        "is_read": notification.is_read,
    })
}

fn preview(content: &str) -> String {
    match content.char_indices().nth(COMMENT_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}
